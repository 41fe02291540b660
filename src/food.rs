use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Random draws attempted before falling back to enumerating free cells.
pub const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Picks a uniformly random cell that the snake does not occupy.
///
/// Draws candidates by rejection sampling first, which is fast while the
/// board is mostly empty. Once `MAX_SAMPLING_ATTEMPTS` draws have all landed
/// on the snake, the free cells are enumerated and one is picked directly.
/// Returns `None` only when the snake covers the whole board.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    if snake.len() >= bounds.total_cells() {
        return None;
    }

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = Position::new(
            rng.gen_range(0..i32::from(bounds.width)),
            rng.gen_range(0..i32::from(bounds.height)),
        );
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Position> = (0..i32::from(bounds.height))
        .flat_map(|y| (0..i32::from(bounds.width)).map(move |x| Position::new(x, y)))
        .filter(|position| !snake.occupies(*position))
        .collect();

    if free.is_empty() {
        return None;
    }

    Some(free[rng.gen_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::spawn_position;

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = GridSize::square(8);
        let snake = Snake::from_segments(
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
            ],
            Direction::Right,
        );

        for _ in 0..200 {
            let food = spawn_position(&mut rng, bounds, &snake).expect("board has room");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(bounds));
        }
    }

    #[test]
    fn nearly_full_board_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = GridSize::square(5);

        // Serpentine covering every cell except (4, 4).
        let mut segments = Vec::new();
        for y in 0..5 {
            let row: Vec<i32> = if y % 2 == 0 {
                (0..5).collect()
            } else {
                (0..5).rev().collect()
            };
            for x in row {
                if (x, y) != (4, 4) {
                    segments.push(Position::new(x, y));
                }
            }
        }
        let snake = Snake::from_segments(segments, Direction::Right);

        for _ in 0..20 {
            assert_eq!(
                spawn_position(&mut rng, bounds, &snake),
                Some(Position::new(4, 4))
            );
        }
    }

    #[test]
    fn full_board_has_no_spawn_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = GridSize::square(5);
        let segments = (0..25).map(|i| Position::new(i % 5, i / 5)).collect();
        let snake = Snake::from_segments(segments, Direction::Right);

        assert_eq!(spawn_position(&mut rng, bounds, &snake), None);
    }
}
