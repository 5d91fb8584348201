use movetree_core::{materialize, Edge, Lamport, Move, NodeId, State};

fn mv(t: Lamport, parent: u64, child: u64) -> Move<Lamport> {
    Move::new(t, NodeId(parent), NodeId(child), Vec::new())
}

fn in_order(ops: &[Move<Lamport>]) -> State<Lamport> {
    let mut sorted = ops.to_vec();
    sorted.sort_by_key(|op| op.timestamp);
    sorted.into_iter().collect()
}

fn timestamps(state: &State<Lamport>) -> Vec<Lamport> {
    state.operations().iter().map(|e| *e.timestamp()).collect()
}

#[test]
fn late_move_lands_at_its_timestamp() {
    let mut state = State::new();
    state.apply(mv(0, 0, 1));
    state.apply(mv(2, 0, 2));
    state.apply(mv(4, 2, 1));

    state.apply(mv(1, 1, 3));

    assert_eq!(timestamps(&state), vec![0, 1, 2, 4]);
    assert_eq!(state.tree().parent(NodeId(3)), Some(NodeId(1)));
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(2)));
    assert_eq!(
        state,
        in_order(&[mv(0, 0, 1), mv(1, 1, 3), mv(2, 0, 2), mv(4, 2, 1)])
    );
    state.validate_invariants().unwrap();
}

#[test]
fn reordering_turns_noop_into_effective_move() {
    let mut state = State::new();
    state.apply(mv(0, 1, 2));
    state.apply(mv(2, 2, 3));
    state.apply(mv(4, 3, 1)); // 3 -> 2 -> 1, so 1 under 3 is a cycle
    assert_eq!(state.is_noop(2), Some(true));
    assert_eq!(state.tree().parent(NodeId(1)), None);

    // Moving 2 away from 1 before the rest breaks the chain.
    state.apply(mv(1, 0, 2));

    assert_eq!(timestamps(&state), vec![0, 1, 2, 4]);
    assert_eq!(state.is_noop(3), Some(false));
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(3)));
    assert_eq!(state.tree().parent(NodeId(2)), Some(NodeId(0)));
    assert_eq!(state.tree().parent(NodeId(3)), Some(NodeId(2)));
    assert_eq!(
        state,
        in_order(&[mv(0, 1, 2), mv(1, 0, 2), mv(2, 2, 3), mv(4, 3, 1)])
    );
    state.validate_invariants().unwrap();
}

#[test]
fn reordering_turns_effective_move_into_noop() {
    let mut state = State::new();
    state.apply(mv(0, 0, 1));
    state.apply(mv(2, 2, 3));
    state.apply(mv(4, 3, 1));
    assert_eq!(state.is_noop(2), Some(false));
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(3)));

    // 2 under 1 makes 3 a descendant of 1 by the time 1 under 3 runs.
    state.apply(mv(1, 1, 2));

    assert_eq!(timestamps(&state), vec![0, 1, 2, 4]);
    assert_eq!(state.is_noop(3), Some(true));
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(0)));
    assert_eq!(state.tree().parent(NodeId(2)), Some(NodeId(1)));
    assert_eq!(state.tree().parent(NodeId(3)), Some(NodeId(2)));
    state.validate_invariants().unwrap();
}

#[test]
fn replayed_entries_get_fresh_undo_records() {
    let mut state = State::new();
    state.apply(mv(0, 0, 1));
    state.apply(mv(4, 5, 1));
    assert_eq!(
        state.operations()[1].previous,
        Some(Edge::new(NodeId(0), Vec::new()))
    );

    state.apply(Move::new(2, NodeId(7), NodeId(1), b"seven".to_vec()));

    let log = state.operations();
    assert_eq!(log[1].previous, Some(Edge::new(NodeId(0), Vec::new())));
    assert_eq!(log[2].previous, Some(Edge::new(NodeId(7), b"seven".to_vec())));
    assert_eq!(state.tree().parent(NodeId(1)), Some(NodeId(5)));
}

#[test]
fn move_older_than_whole_log_replays_everything() {
    let ops = vec![mv(5, 0, 1), mv(6, 1, 2), mv(7, 2, 3), mv(8, 3, 0)];
    let mut state: State<Lamport> = ops.iter().cloned().collect();

    state.apply(mv(1, 3, 1));

    let mut all = ops.clone();
    all.insert(0, mv(1, 3, 1));
    assert_eq!(state.tree(), &materialize(&all));
    assert_eq!(timestamps(&state), vec![1, 5, 6, 7, 8]);
    state.validate_invariants().unwrap();
}
