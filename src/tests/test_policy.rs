use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::td::{Policy, ValueWeightedPolicy, PolicyKind};
use crate::types::{Direction, Position};

#[test]
fn test_single_positive_neighbour_always_chosen() {
    let mut values = Array2::from_elem((5, 5), -1.0);
    values[[2, 3]] = 0.7;
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..1000 {
        let direction = ValueWeightedPolicy
            .select_direction(values.view(), Position::new(2, 2), &mut rng)
            .unwrap();
        assert_eq!(direction, Direction::Right);
    }
}

#[test]
fn test_off_board_neighbours_never_chosen() {
    let values = Array2::from_elem((5, 5), 1.0);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..500 {
        let direction = ValueWeightedPolicy
            .select_direction(values.view(), Position::new(0, 0), &mut rng)
            .unwrap();
        assert!(direction == Direction::Down || direction == Direction::Right);
    }
}

#[test]
fn test_choice_proportional_to_value() {
    let mut values = Array2::zeros((3, 3));
    values[[2, 1]] = 1.0; // below
    values[[1, 2]] = 3.0; // right
    let mut rng = StdRng::seed_from_u64(12);

    let draws = 10_000;
    let mut right = 0;
    for _ in 0..draws {
        let direction = ValueWeightedPolicy
            .select_direction(values.view(), Position::new(1, 1), &mut rng)
            .unwrap();
        match direction {
            Direction::Right => right += 1,
            Direction::Down => {}
            other => panic!("zero-valued neighbour {:?} selected", other),
        }
    }

    let share = right as f32 / draws as f32;
    assert!((share - 0.75).abs() < 0.03, "right share {}", share);
}

#[test]
fn test_policy_kind_builds_matching_policy() {
    assert_eq!(PolicyKind::Random.build().name(), "random");
    assert_eq!(PolicyKind::ValueWeighted.build().name(), "value_weighted");
    assert_eq!(PolicyKind::default(), PolicyKind::ValueWeighted);
}
