use slidepath::search::MoveResolver;
use slidepath::state::{SearchState, visited_cells};
use slidepath::{Agent, Direction, Grid, Position, find_path};

fn corridor(length: i32) -> Grid {
    let mut grid = Grid::new(length, 1);
    grid.enclose();
    grid
}

#[test]
fn test_two_by_two_single_food() {
    let mut grid = Grid::enclosed(2);
    grid.add_food(Position::new(1, 1));
    let agents = Agent::from_positions(&[Position::new(0, 0)]);

    let path = find_path(&agents, &grid, false).expect("map is solvable");

    assert_eq!(path.len(), 2);
    assert_eq!(path.final_positions(), vec![Position::new(1, 1)]);
    assert!(visited_cells(&path, &grid).contains(&Position::new(1, 1)));
}

#[test]
fn test_no_food_needs_no_commands() {
    let grid = Grid::enclosed(4);
    let agents = Agent::from_positions(&[Position::new(0, 0), Position::new(3, 3)]);

    let path = find_path(&agents, &grid, false).unwrap();
    assert!(path.is_empty());
    assert_eq!(path.snapshots().len(), 1);
    assert!(path.commands().is_empty());
}

#[test]
fn test_switch_beyond_gate_with_switch_held_off() {
    // agent | gate | food | switch
    let mut grid = corridor(4);
    let switch = grid.add_switch(Position::new(3, 0)).unwrap();
    grid.add_gate_between(Position::new(0, 0), Direction::Right, switch);
    grid.add_food(Position::new(2, 0));
    let agents = Agent::from_positions(&[Position::new(0, 0)]);

    assert!(find_path(&agents, &grid, true).is_none());
    assert!(find_path(&agents, &grid, false).is_none());
}

#[test]
fn test_gate_needs_switch_to_open() {
    // The agent starts on the switch; leaving it opens the gate ahead.
    let mut grid = corridor(4);
    let switch = grid.add_switch(Position::new(0, 0)).unwrap();
    grid.add_gate_between(Position::new(1, 0), Direction::Right, switch);
    grid.add_food(Position::new(3, 0));
    let agents = Agent::from_positions(&[Position::new(0, 0)]);

    let path = find_path(&agents, &grid, false).expect("gate opens");
    assert_eq!(path.commands(), vec![Direction::Right]);
    assert_eq!(path.final_positions(), vec![Position::new(3, 0)]);

    assert!(
        find_path(&agents, &grid, true).is_none(),
        "gate stays shut when the switch is held off"
    );
}

#[test]
fn test_leading_agent_moves_first() {
    // Food sits under agent 1; it only gets collected if agent 1 moves away
    // before agent 0 slides in behind it.
    let mut grid = corridor(3);
    grid.add_food(Position::new(1, 0));
    let agents = Agent::from_positions(&[Position::new(0, 0), Position::new(1, 0)]);

    let path = find_path(&agents, &grid, false).expect("solvable in one command");
    assert_eq!(path.commands(), vec![Direction::Right]);
    assert_eq!(
        path.final_positions(),
        vec![Position::new(1, 0), Position::new(2, 0)]
    );
}

#[test]
fn test_replay_reproduces_snapshots() {
    let mut grid = Grid::enclosed(3);
    grid.add_wall_between(Position::new(0, 1), Direction::Right);
    grid.add_wall_between(Position::new(1, 1), Direction::Right);
    grid.add_food(Position::new(2, 2));
    let agents = Agent::from_positions(&[Position::new(0, 0), Position::new(2, 0)]);

    let path = find_path(&agents, &grid, false).expect("solvable");
    let resolver = MoveResolver::new(&grid, false);
    let mut state = SearchState::initial(&agents);
    for (command, snapshot) in path.commands().into_iter().zip(&path.snapshots()[1..]) {
        state = resolver.apply_command(&state, command);
        let positions: Vec<Position> = state.agents().iter().map(|a| a.pos).collect();
        let expected: Vec<Position> = snapshot.iter().map(|s| s.pos).collect();
        assert_eq!(positions, expected, "replay diverged on {}", command);

        let mut unique = positions.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), positions.len(), "agents never share a cell");
    }
    assert_eq!(state.food_count(), 1);
}

#[test]
fn test_teleport_reaches_isolated_food() {
    // The right column is walled off from the rest; only the teleport leads in.
    let mut grid = Grid::enclosed(4);
    for y in 0..4 {
        grid.add_wall_between(Position::new(2, y), Direction::Right);
    }
    grid.add_teleport(Position::new(1, 0), Position::new(3, 2));
    grid.add_food(Position::new(3, 3));
    let agents = Agent::from_positions(&[Position::new(0, 0)]);

    let path = find_path(&agents, &grid, false).expect("teleport leads to the food");
    assert!(path.final_positions().contains(&Position::new(3, 3)));
    assert!(visited_cells(&path, &grid).contains(&Position::new(3, 2)));
}

#[test]
fn test_food_under_start_must_be_reentered() {
    let mut grid = corridor(3);
    grid.add_food(Position::new(0, 0));
    let agents = Agent::from_positions(&[Position::new(0, 0)]);

    let path = find_path(&agents, &grid, false).unwrap();
    assert_eq!(path.commands(), vec![Direction::Right, Direction::Left]);
}

#[test]
fn test_prefers_food_rich_branch() {
    // Food at both ends of the corridor; the search finishes the job once
    // one end is reached instead of widening at depth one.
    let mut grid = corridor(5);
    grid.add_food(Position::new(0, 0));
    grid.add_food(Position::new(4, 0));
    let agents = Agent::from_positions(&[Position::new(2, 0)]);

    let path = find_path(&agents, &grid, false).unwrap();
    assert_eq!(path.commands(), vec![Direction::Left, Direction::Right]);
}
