#[cfg(test)]
mod tests {
    use crate::components::PALETTE;
    use crate::game::*;

    #[test]
    fn test_board_dimensions() {
        assert_eq!(FIELD_WIDTH, 10);
        assert_eq!(FIELD_HEIGHT, 20);
    }

    #[test]
    fn test_spawn_offset() {
        assert_eq!(SPAWN_ROW, -2);
        assert_eq!(SPAWN_COL, 5);
    }

    #[test]
    fn test_scoring_constants() {
        assert_eq!(SCORE_PER_ELIMINATED_LINES, [0, 40, 100, 300, 1200]);
        assert_eq!(LINES_PER_LEVEL, 10);
    }

    #[test]
    fn test_palette_size() {
        assert_eq!(usize::from(PALETTE_SIZE), PALETTE.len());
    }

    #[test]
    fn test_drop_timing_defaults() {
        assert!(MIN_DROP_INTERVAL_MS > 0);
        assert!(BASE_DROP_INTERVAL_MS > MIN_DROP_INTERVAL_MS);
        assert!(SOFT_DROP_INTERVAL_MS <= BASE_DROP_INTERVAL_MS);
    }
}
