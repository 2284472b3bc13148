//! Editor view actions applied through an edit session

use pagekit_blocks::{BlockList, BlockRegistry, BlockType, Properties, TextProps};
use pagekit_editor::{EditSession, SessionConfig};
use pagekit_render::{Content, EditAction, EditorView, PublicView, QueryParams};
use serde_json::json;

fn session() -> EditSession {
    let doc: BlockList = serde_json::from_value(json!([
        { "id": "hero", "type": "group", "properties": { "blocks": [
            { "id": "title", "type": "gradient-title", "original": true,
              "properties": { "content": "Gala" } }
        ] } },
        { "id": "footer", "type": "text", "properties": { "content": "Thanks" } }
    ]))
    .unwrap();

    let mut session =
        EditSession::with_registry(SessionConfig::default(), BlockRegistry::sequential("r"));
    session.load(doc);
    session
}

#[test]
fn test_offered_actions_are_accepted() -> anyhow::Result<()> {
    let mut session = session();
    let nodes = EditorView::build(session.document());

    let hero = EditorView::find(&nodes, "hero").unwrap();
    for mutation in [
        hero.insert_inside(BlockType::Countdown).unwrap(),
        hero.duplicate(),
        hero.toggle_visibility(),
    ] {
        assert!(session.apply(mutation)?);
    }

    let footer = EditorView::find(&nodes, "footer").unwrap();
    assert!(session.apply(footer.wrap(BlockType::Row).unwrap())?);
    assert!(session.apply(footer.remove().unwrap())?);

    let rebuilt = EditorView::build(session.document());
    assert!(EditorView::find(&rebuilt, "footer").is_none());
    assert!(!EditorView::find(&rebuilt, "hero").unwrap().visible);
    Ok(())
}

#[test]
fn test_withheld_remove_matches_session_policy() {
    let mut session = session();
    let nodes = EditorView::build(session.document());

    for node in nodes.iter().flat_map(|n| n.iter()) {
        if !node.allows(EditAction::Remove) {
            assert!(session.remove_block(&node.id).unwrap_err().is_protected());
        }
    }
}

#[test]
fn test_public_view_follows_edits() -> anyhow::Result<()> {
    let mut session = session();
    let nodes = EditorView::build(session.document());
    let footer = EditorView::find(&nodes, "footer").unwrap();

    let edit = footer
        .update(Properties::Text(TextProps::new("See you soon")))
        .unwrap();
    session.apply(edit)?;
    session.set_visible("hero", false);

    let public = PublicView::build(&session.save_snapshot(), &QueryParams::new());
    assert_eq!(public.len(), 1);
    assert_eq!(
        public[0].content,
        Content::Text {
            content: "See you soon".to_string()
        }
    );
    Ok(())
}
