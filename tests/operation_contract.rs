use chrono::{DateTime, TimeZone, Utc};
use doc_history::document::{DocumentError, DocumentId, DocumentStore};
use doc_history::history::{Operation, OperationError, OperationState};

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, second).unwrap()
}

fn store_with(id: &str, content: &str) -> DocumentStore {
    let mut store = DocumentStore::new();
    Operation::create(id, "Title", content)
        .execute(&mut store, at(0))
        .unwrap();
    store
}

#[test]
fn contract_undo_before_execute_is_rejected() {
    let mut store = store_with("doc", "v1");
    let snapshot = store.clone();

    for mut op in [
        Operation::create("other", "Other", ""),
        Operation::edit("doc", "v2"),
        Operation::delete("doc"),
        Operation::group([Operation::edit("doc", "v2")]),
    ] {
        let label = op.label();
        let err = op.undo(&mut store).unwrap_err();
        assert_eq!(err, OperationError::NotExecuted(label));
        assert_eq!(op.state(), OperationState::Unexecuted);
    }

    assert_eq!(store, snapshot);
}

#[test]
fn contract_state_machine_cycles() {
    let mut store = store_with("doc", "v1");
    let mut op = Operation::edit("doc", "v2");
    assert_eq!(op.state(), OperationState::Unexecuted);

    op.execute(&mut store, at(1)).unwrap();
    assert_eq!(op.state(), OperationState::Executed);

    op.undo(&mut store).unwrap();
    assert_eq!(op.state(), OperationState::Undone);

    // Undone -> undo is illegal too.
    assert!(matches!(op.undo(&mut store), Err(OperationError::NotExecuted(_))));

    op.execute(&mut store, at(2)).unwrap();
    assert_eq!(op.state(), OperationState::Executed);
}

#[test]
fn contract_double_execute_is_rejected() {
    let mut store = store_with("doc", "v1");
    let mut op = Operation::edit("doc", "v2");
    op.execute(&mut store, at(1)).unwrap();

    let err = op.execute(&mut store, at(2)).unwrap_err();
    assert_eq!(err, OperationError::AlreadyExecuted("edit doc".to_string()));

    // The first capture is intact.
    op.undo(&mut store).unwrap();
    assert_eq!(store.get(&DocumentId::new("doc")).unwrap().content, "v1");
}

#[test]
fn contract_delete_snapshot_restores_every_field() {
    let mut store = store_with("doc", "body");
    let mut edit = Operation::edit("doc", "edited");
    edit.execute(&mut store, at(5)).unwrap();
    let original = store.get(&DocumentId::new("doc")).unwrap().clone();

    let mut delete = Operation::delete("doc");
    delete.execute(&mut store, at(9)).unwrap();
    assert!(store.is_empty());

    delete.undo(&mut store).unwrap();
    let restored = store.get(&DocumentId::new("doc")).unwrap();
    assert_eq!(restored, &original);
    assert_eq!(restored.modified_at, at(5));
    assert_eq!(restored.created_at, at(0));
}

#[test]
fn contract_macro_undoes_in_reverse_order() {
    let mut store = DocumentStore::new();

    // Forward order only works create -> edit -> edit -> delete; undoing in
    // forward order would fail on the first edit.
    let mut op = Operation::group([
        Operation::create("doc", "Title", "a"),
        Operation::edit("doc", "b"),
        Operation::edit("doc", "c"),
        Operation::delete("doc"),
    ]);
    op.execute(&mut store, at(1)).unwrap();
    assert!(store.is_empty());

    op.undo(&mut store).unwrap();
    assert!(store.is_empty());
    assert_eq!(op.state(), OperationState::Undone);

    op.execute(&mut store, at(2)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn contract_nested_macros() {
    let mut store = DocumentStore::new();
    let mut op = Operation::group([
        Operation::create("a", "A", "1"),
        Operation::group([Operation::create("b", "B", "2"), Operation::edit("a", "3")]),
    ]);

    op.execute(&mut store, at(1)).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&DocumentId::new("a")).unwrap().content, "3");

    op.undo(&mut store).unwrap();
    assert!(store.is_empty());
}

#[test]
fn contract_failing_macro_leaves_prefix_applied() {
    let mut store = DocumentStore::new();
    let mut op = Operation::group([
        Operation::create("a", "A", ""),
        Operation::edit("missing", "x"),
        Operation::create("b", "B", ""),
    ]);

    let err = op.execute(&mut store, at(1)).unwrap_err();
    assert_eq!(
        err,
        OperationError::Document(DocumentError::NotFound(DocumentId::new("missing")))
    );

    // Known limitation: no compensating rollback.
    assert!(store.contains(&DocumentId::new("a")));
    assert!(!store.contains(&DocumentId::new("b")));
    assert_eq!(op.state(), OperationState::Unexecuted);
}

#[test]
fn contract_empty_macro_is_a_no_op() {
    let mut store = store_with("doc", "v1");
    let snapshot = store.clone();

    let mut op = Operation::group(Vec::new());
    op.execute(&mut store, at(1)).unwrap();
    op.undo(&mut store).unwrap();

    assert_eq!(store, snapshot);
    assert_eq!(op.label(), "macro[]");
}

#[test]
fn contract_accessors_expose_targets() {
    let op = Operation::group([
        Operation::create("a", "A", ""),
        Operation::edit("b", "x"),
        Operation::delete("c"),
    ]);

    let Operation::Macro(group) = &op else {
        panic!("expected macro, got {op:?}");
    };
    let ids: Vec<&str> = group
        .children()
        .iter()
        .map(|child| match child {
            Operation::Create(op) => op.id().as_str(),
            Operation::Edit(op) => op.id().as_str(),
            Operation::Delete(op) => op.id().as_str(),
            Operation::Macro(_) => "macro",
        })
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}
