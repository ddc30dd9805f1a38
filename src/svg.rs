//! SVG serialization of a drawn frame.

use crate::config::RendererConfig;
use crate::theme::CardPalette;
use crate::transition::{Frame, LabelSide, NodeGlyph};

/// Writes `frame` as a standalone `<svg>` document.
///
/// Links go into one group and nodes into another, so nodes always paint
/// over links. Fading elements carry their opacity.
pub fn render_svg(frame: &Frame, config: &RendererConfig, palette: &CardPalette) -> String {
    let vb = frame.viewport;
    let mut out = String::with_capacity(256 + frame.nodes.len() * 256);

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" \
         style=\"max-width: 100%; height: auto; font: {}px sans-serif; user-select: none;\">\n",
        fmt_num(vb.width),
        fmt_num(vb.height),
        fmt_num(vb.x),
        fmt_num(vb.y),
        fmt_num(vb.width),
        fmt_num(vb.height),
        fmt_num(config.font_size),
    ));

    out.push_str(&format!(
        "  <g fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"1.5\">\n",
        palette.link,
        fmt_num(palette.link_opacity),
    ));
    for link in &frame.links {
        let [s, c1, c2, t] = link.shape.bezier();
        out.push_str(&format!(
            "    <path data-target=\"{}\" d=\"M{},{}C{},{} {},{} {},{}\"/>\n",
            link.target,
            fmt_num(s.x),
            fmt_num(s.y),
            fmt_num(c1.x),
            fmt_num(c1.y),
            fmt_num(c2.x),
            fmt_num(c2.y),
            fmt_num(t.x),
            fmt_num(t.y),
        ));
    }
    out.push_str("  </g>\n");

    out.push_str("  <g cursor=\"pointer\" pointer-events=\"all\">\n");
    for node in &frame.nodes {
        write_node(&mut out, node, config, palette);
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

fn write_node(out: &mut String, node: &NodeGlyph, config: &RendererConfig, palette: &CardPalette) {
    let opacity = if node.opacity < 1.0 {
        format!(" fill-opacity=\"{0}\" stroke-opacity=\"{0}\"", fmt_num(node.opacity))
    } else {
        String::new()
    };
    let (x, anchor) = match node.label_side {
        LabelSide::Left => (-config.label_offset, "end"),
        LabelSide::Right => (config.label_offset, "start"),
    };
    let label = escape(&node.label);

    out.push_str(&format!(
        "    <g data-id=\"{}\" transform=\"translate({},{})\"{}>\n",
        node.id,
        fmt_num(node.position.x),
        fmt_num(node.position.y),
        opacity,
    ));
    out.push_str(&format!(
        "      <circle r=\"{}\" fill=\"{}\" stroke-width=\"10\"/>\n",
        fmt_num(config.node_radius),
        node.fill,
    ));
    out.push_str(&format!(
        "      <text dy=\"0.31em\" x=\"{}\" text-anchor=\"{}\" stroke-linejoin=\"round\" stroke-width=\"3\" stroke=\"{}\">{}</text>\n",
        fmt_num(x),
        anchor,
        palette.halo,
        label,
    ));
    out.push_str(&format!(
        "      <text dy=\"0.31em\" x=\"{}\" text-anchor=\"{}\" fill=\"{}\">{}</text>\n",
        fmt_num(x),
        anchor,
        palette.text,
        label,
    ));
    out.push_str("    </g>\n");
}

/// Formats a coordinate with at most two decimals and no negative zero.
fn fmt_num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 || !rounded.is_finite() {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::transition::{LinkGlyph, LinkShape, Point, Viewport};

    fn sample() -> Frame {
        Frame {
            viewport: Viewport {
                x: -40.0,
                y: -15.0,
                width: 628.0,
                height: 30.0,
            },
            nodes: vec![
                NodeGlyph {
                    id: 1,
                    label: "A & <B>".to_string(),
                    fill: Rgb::new(0x6e, 0x40, 0xaa),
                    label_side: LabelSide::Right,
                    position: Point::new(289.0, -5.0),
                    opacity: 0.5,
                    exiting: false,
                },
                NodeGlyph {
                    id: 0,
                    label: "Root".to_string(),
                    fill: Rgb::new(0x55, 0x55, 0x55),
                    label_side: LabelSide::Left,
                    position: Point::new(0.0, 0.0),
                    opacity: 1.0,
                    exiting: false,
                },
            ],
            links: vec![LinkGlyph {
                target: 1,
                shape: LinkShape {
                    source: Point::new(0.0, 0.0),
                    target: Point::new(289.0, -5.0),
                },
                exiting: false,
            }],
        }
    }

    #[test]
    fn test_document_structure() {
        let svg = render_svg(&sample(), &RendererConfig::default(), &CardPalette::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains("viewBox=\"-40 -15 628 30\""));
        assert!(svg.contains("font: 10px sans-serif"));
        assert!(svg.contains("stroke=\"#555555\" stroke-opacity=\"0.4\" stroke-width=\"1.5\""));
        assert!(svg.contains("d=\"M0,0C144.5,0 144.5,-5 289,-5\""));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<text").count(), 4);
    }

    #[test]
    fn test_node_attributes() {
        let svg = render_svg(&sample(), &RendererConfig::default(), &CardPalette::default());
        assert!(svg.contains("data-id=\"1\" transform=\"translate(289,-5)\" fill-opacity=\"0.5\""));
        assert!(svg.contains("data-id=\"0\" transform=\"translate(0,0)\">"));
        assert!(svg.contains("x=\"-6\" text-anchor=\"end\""));
        assert!(svg.contains("x=\"6\" text-anchor=\"start\""));
        assert!(svg.contains("A &amp; &lt;B&gt;"));
        assert!(!svg.contains("<B>"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(192.666_67), "192.67");
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(f32::NAN), "0");
    }
}
