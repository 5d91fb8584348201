use movetree_core::{Edge, Lamport, Move, NodeId, State};

fn mv(t: Lamport, parent: u64, child: u64) -> Move<Lamport> {
    Move::new(t, NodeId(parent), NodeId(child), Vec::new())
}

#[test]
fn prevents_cycle_on_move() {
    let mut state = State::new();
    state.apply(mv(1, 0, 1));
    state.apply(mv(2, 1, 2));

    state.apply(mv(3, 2, 1));

    assert_eq!(state.len(), 3);
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(0)));
    assert_eq!(state.tree().parent(NodeId(2)), Some(NodeId(1)));
    assert_eq!(state.is_noop(2), Some(true));
    state.validate_invariants().unwrap();
}

#[test]
fn cycles_through_deep_descendants_are_blocked() {
    let mut state = State::new();
    for child in 1..=5 {
        state.apply(mv(child, child - 1, child));
    }
    assert_eq!(state.tree().depth(NodeId(5)), 5);

    state.apply(mv(10, 5, 1));

    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(0)));
    assert_eq!(
        state.operations().last().unwrap().previous,
        Some(Edge::new(NodeId(0), Vec::new()))
    );
    state.validate_invariants().unwrap();
}

#[test]
fn self_move_is_logged_without_effect() {
    let mut state = State::new();
    state.apply(mv(1, 0, 1));
    state.apply(mv(2, 1, 1));

    assert_eq!(state.len(), 2);
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(0)));

    // A self move on a node the tree has never seen does not create an entry either.
    state.apply(mv(3, 9, 9));
    assert!(!state.tree().contains(NodeId(9)));
    assert_eq!(state.is_noop(2), Some(true));
}

#[test]
fn unseen_parent_is_an_implicit_root() {
    let mut state = State::new();
    state.apply(mv(1, 100, 1));

    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(100)));
    assert!(!state.tree().contains(NodeId(100)));
    assert_eq!(state.tree().children(NodeId(100)), vec![NodeId(1)]);
}

#[test]
fn duplicates_are_not_filtered() {
    let mut state = State::new();
    let op = mv(1, 0, 1);
    state.apply(op.clone());
    state.apply(op.clone());
    state.apply(op);

    assert_eq!(state.len(), 3);
    assert_eq!(
        state.operations()[1].previous,
        Some(Edge::new(NodeId(0), Vec::new()))
    );
    assert_eq!(state.tree().len(), 1);
    state.validate_invariants().unwrap();
}

#[test]
fn rename_keeps_parent_and_replaces_meta() {
    let mut state = State::new();
    state.apply(Move::new(1, NodeId(0), NodeId(1), b"draft.txt".to_vec()));
    state.apply(Move::new(2, NodeId(0), NodeId(1), b"final.txt".to_vec()));

    assert_eq!(
        state.tree().get(NodeId(1)),
        Some(&Edge::new(NodeId(0), b"final.txt".to_vec()))
    );
    assert_eq!(
        state.operations()[1].previous,
        Some(Edge::new(NodeId(0), b"draft.txt".to_vec()))
    );
}

#[test]
fn moving_a_subtree_carries_descendants() {
    let mut state = State::new();
    state.apply(mv(1, 0, 1));
    state.apply(mv(2, 1, 2));
    state.apply(mv(3, 2, 3));
    state.apply(mv(4, 0, 4));

    state.apply(mv(5, 4, 1));

    assert!(state.tree().is_ancestor(NodeId(4), NodeId(3)));
    assert_eq!(state.tree().depth(NodeId(3)), 4);
    assert_eq!(state.tree().children(NodeId(0)), vec![NodeId(4)]);
}

#[test]
fn latest_timestamp_tracks_newest_entry() {
    let mut state = State::new();
    assert_eq!(state.latest_timestamp(), None);
    state.apply(mv(7, 0, 1));
    state.apply(mv(3, 0, 2));
    assert_eq!(state.latest_timestamp(), Some(&7));
}
