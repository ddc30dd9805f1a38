use treecard::hierarchy::LayoutTree;
use treecard::layout::TidyTree;
use treecard::svg::render_svg;
use treecard::{read_tree, ClickEvent, Detached, ExpansionPolicy, NodeRecord, RandomTreeReader, RendererConfig};
use treecard::{TreeError, TreeNode, TreeRenderer, TreeWriter};
use anyhow::Result;
use std::collections::HashSet;
use std::env;
use std::fs;

fn expanded_config() -> RendererConfig {
    RendererConfig {
        expansion: ExpansionPolicy::Expanded,
        ..RendererConfig::default()
    }
}

fn sample_tree() -> TreeNode {
    TreeNode::with_children(
        "root",
        vec![
            TreeNode::with_children("A", vec![TreeNode::leaf("a1"), TreeNode::leaf("a2")]),
            TreeNode::with_children("B", vec![TreeNode::leaf("b1")]),
        ],
    )
}

fn record(id: u64, parent_id: Option<u64>, name: &str) -> NodeRecord {
    NodeRecord {
        id,
        parent_id,
        name: name.to_string(),
    }
}

#[test]
fn test_root_with_two_children() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, RendererConfig::default());
    renderer.render_json(r#"{"name":"Root","children":[{"name":"A"},{"name":"B"}]}"#)?;

    let frame = renderer.settled_frame().expect("rendered");
    assert_eq!(frame.nodes.len(), 3);
    assert_eq!(frame.links.len(), 2);

    // The root paints last so it sits on top.
    assert_eq!(frame.nodes.last().map(|node| node.id), Some(0));
    Ok(())
}

#[test]
fn test_ids_are_unique_and_breadth_first() -> Result<()> {
    let tree = RandomTreeReader::with_config(5, 4, 7).generate();
    let layout = LayoutTree::build(&tree, ExpansionPolicy::Expanded);

    let ids: HashSet<usize> = layout.iter().map(|node| node.id).collect();
    assert_eq!(ids.len(), tree.node_count());
    assert_eq!(layout.root().id, 0);

    // Depths never decrease along id order.
    let depths: Vec<usize> = layout.iter().map(|node| node.depth).collect();
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));

    // Rebuilding the same input hands out the same ids.
    let again = LayoutTree::build(&tree, ExpansionPolicy::Expanded);
    assert!(layout.iter().zip(again.iter()).all(|(a, b)| a.id == b.id && a.name == b.name));
    Ok(())
}

#[test]
fn test_depth_axis_is_proportional_to_depth() -> Result<()> {
    let config = expanded_config();
    let mut renderer = TreeRenderer::new(Detached, config.clone());
    renderer.render(&sample_tree())?;

    let dy = (config.width - config.margins.right - config.margins.left) / 3.0;
    let frame = renderer.settled_frame().expect("rendered");
    let tree = renderer.tree().expect("rendered");
    for glyph in &frame.nodes {
        let node = tree.get(glyph.id).expect("known id");
        assert!((glyph.position.x - node.depth as f32 * dy).abs() < 1e-3);
    }
    Ok(())
}

#[test]
fn test_tidy_spacing() -> Result<()> {
    let mut layout = LayoutTree::build(&sample_tree(), ExpansionPolicy::Expanded);
    TidyTree::node_size(10.0, 100.0).apply(&mut layout)?;

    let x = |id: usize| layout.get(id).map(|node| node.x).unwrap_or(f32::NAN);
    // Ids: root 0, A 1, B 2, a1 3, a2 4, b1 5.
    assert_eq!(x(0), 0.0);
    assert!(x(4) - x(3) >= 10.0 - 1e-3);
    assert!(x(5) - x(4) >= 20.0 - 1e-3);
    assert!((x(1) - (x(3) + x(4)) / 2.0).abs() < 1e-3);
    assert!((x(0) - (x(1) + x(2)) / 2.0).abs() < 1e-3);
    Ok(())
}

#[test]
fn test_collapse_then_expand_restores_layout() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, expanded_config());
    renderer.render(&sample_tree())?;
    let before = renderer.settled_frame().expect("rendered");

    assert!(renderer.toggle(1, &ClickEvent::default())?);
    let collapsed = renderer.settled_frame().expect("rendered");
    assert_eq!(collapsed.nodes.len(), 4);
    assert!(collapsed.node(3).is_none());
    assert!(collapsed.node(4).is_none());

    assert!(renderer.toggle(1, &ClickEvent::default())?);
    let after = renderer.settled_frame().expect("rendered");
    assert_eq!(after.nodes.len(), before.nodes.len());
    for glyph in &before.nodes {
        let restored = after.node(glyph.id).expect("node is back");
        assert!((restored.position.x - glyph.position.x).abs() < 1e-3);
        assert!((restored.position.y - glyph.position.y).abs() < 1e-3);
    }
    Ok(())
}

#[test]
fn test_leaf_click_moves_nothing() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, expanded_config());
    renderer.render(&sample_tree())?;
    let before = renderer.settled_frame();

    assert!(!renderer.toggle(5, &ClickEvent::default())?);
    let stats = renderer.stats();
    assert_eq!(stats.entered, 0);
    assert_eq!(stats.exited, 0);
    assert_eq!(renderer.settled_frame(), before);
    Ok(())
}

#[test]
fn test_identical_rerender_has_no_enter_or_exit() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, expanded_config());
    renderer.render(&sample_tree())?;
    renderer.render(&sample_tree())?;

    let stats = renderer.stats();
    assert_eq!(stats.entered, 0);
    assert_eq!(stats.exited, 0);
    assert_eq!(stats.updated, 6);
    Ok(())
}

#[test]
fn test_default_policy_expands_seven_character_labels() -> Result<()> {
    let data = TreeNode::with_children(
        "root",
        vec![
            TreeNode::with_children("seven77", vec![TreeNode::leaf("x")]),
            TreeNode::with_children("six666", vec![TreeNode::leaf("y")]),
        ],
    );
    let mut renderer = TreeRenderer::new(Detached, RendererConfig::default());
    renderer.render(&data)?;

    let frame = renderer.settled_frame().expect("rendered");
    assert_eq!(frame.nodes.len(), 4);
    assert!(frame.node(3).is_some());
    assert!(frame.node(4).is_none());

    let collapsed_fill = renderer.palette().collapsed;
    assert_eq!(frame.node(2).map(|node| node.fill), Some(collapsed_fill));
    assert_ne!(frame.node(1).map(|node| node.fill), Some(collapsed_fill));
    Ok(())
}

#[test]
fn test_invalid_input_is_rejected() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, RendererConfig::default());
    assert!(matches!(
        renderer.render_json(r#"{"name":"root","children":[{"children":[]}]}"#),
        Err(TreeError::MissingName { .. })
    ));
    assert!(matches!(
        renderer.render_json(r#"{"name":"root","children":"nope"}"#),
        Err(TreeError::InvalidChildren { .. })
    ));
    assert!(renderer.settled_frame().is_none());
    Ok(())
}

#[test]
fn test_bad_records_are_rejected() -> Result<()> {
    let cycle = [
        record(0, None, "root"),
        record(1, Some(2), "a"),
        record(2, Some(1), "b"),
    ];
    assert!(TreeNode::from_records(&cycle).is_err());

    let duplicate = [record(0, None, "root"), record(1, Some(0), "a"), record(1, Some(0), "b")];
    assert!(matches!(TreeNode::from_records(&duplicate), Err(TreeError::DuplicateRecord(1))));

    let orphan = [record(0, None, "root"), record(1, Some(9), "a")];
    assert!(matches!(
        TreeNode::from_records(&orphan),
        Err(TreeError::UnknownParent { id: 1, parent_id: 9 })
    ));
    Ok(())
}

#[test]
fn test_write_and_read_records() -> Result<()> {
    let tree = RandomTreeReader::with_config(3, 3, 11).generate();

    for name in ["test_tree_card.jsonl", "test_tree_card.jsonl.br"] {
        let path = env::temp_dir().join(name);
        let path = path.to_str().expect("utf-8 temp path");
        let _ = fs::remove_file(path);

        {
            let mut writer = TreeWriter::new(path)?;
            writer.write_tree(&tree)?;
            assert_eq!(writer.record_count(), tree.node_count());
        }

        assert_eq!(read_tree(path)?, tree);
        fs::remove_file(path)?;
    }
    Ok(())
}

#[test]
fn test_write_and_read_nested() -> Result<()> {
    let path = env::temp_dir().join("test_tree_card_nested.json.br");
    let path = path.to_str().expect("utf-8 temp path");
    let _ = fs::remove_file(path);

    {
        let mut writer = TreeWriter::new(path)?;
        writer.write_nested(&sample_tree())?;
    }

    assert_eq!(read_tree(path)?, sample_tree());
    fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_deep_nested_tree_round_trips() -> Result<()> {
    let records: Vec<NodeRecord> = (0..=100u64)
        .map(|id| record(id, id.checked_sub(1), &format!("level{}", id)))
        .collect();
    let tree = TreeNode::from_records(&records)?;
    assert_eq!(tree.height(), 100);

    let mut renderer = TreeRenderer::new(Detached, expanded_config());
    renderer.render(&tree)?;

    let path = env::temp_dir().join("test_tree_card_deep.json");
    let path = path.to_str().expect("utf-8 temp path");
    let _ = fs::remove_file(path);

    {
        let mut writer = TreeWriter::new(path)?;
        writer.write_nested(&tree)?;
    }

    assert_eq!(read_tree(path)?, tree);
    fs::remove_file(path)?;
    Ok(())
}

#[test]
fn test_read_missing_file() {
    let err = read_tree("/nonexistent/tree.json").unwrap_err();
    assert!(err.to_string().contains("Failed to open file"));
}

#[test]
fn test_svg_document() -> Result<()> {
    let mut renderer = TreeRenderer::new(Detached, RendererConfig::default());
    renderer.render_json(r#"{"name":"Root","children":[{"name":"A & B"},{"name":"C"}]}"#)?;
    let frame = renderer.settled_frame().expect("rendered");
    let svg = render_svg(&frame, renderer.config(), renderer.palette());

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("viewBox=\"-40 -15 628 30\""));
    assert_eq!(svg.matches("<path").count(), 2);
    assert_eq!(svg.matches("<circle").count(), 3);
    assert!(svg.contains("A &amp; B"));
    assert!(svg.trim_end().ends_with("</svg>"));
    Ok(())
}
