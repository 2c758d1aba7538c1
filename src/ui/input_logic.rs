/// Move a menu cursor by a signed number of encoder detents.
///
/// Moving up stops at the first item, moving down stops at the last one.
pub fn apply_detents(selected: usize, detents: i32, item_count: usize) -> usize {
    let last = item_count.saturating_sub(1);
    if detents < 0 {
        selected.saturating_sub(detents.unsigned_abs() as usize)
    } else {
        selected.saturating_add(detents as usize).min(last)
    }
}

/// First item of the window page that contains `selected`.
pub fn page_start(selected: usize, window: usize) -> usize {
    if window == 0 {
        return 0;
    }
    selected - selected % window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_at_both_ends() {
        assert_eq!(apply_detents(0, -1, 4), 0);
        assert_eq!(apply_detents(2, -1, 4), 1);
        assert_eq!(apply_detents(2, i32::MIN, 4), 0);
        assert_eq!(apply_detents(1, 1, 4), 2);
        assert_eq!(apply_detents(1, 100, 4), 3);
        assert_eq!(apply_detents(3, i32::MAX, 4), 3);
    }

    #[test]
    fn cursor_stays_in_bounds_for_any_sequence() {
        let mut seed: u32 = 0x2545_f491;
        for count in 1..8 {
            let mut selected = 0;
            for _ in 0..500 {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let detents = ((seed >> 16) % 21) as i32 - 10;
                selected = apply_detents(selected, detents, count);
                assert!(selected < count);
            }
        }
    }

    #[test]
    fn pages_follow_window_height() {
        assert_eq!(page_start(0, 3), 0);
        assert_eq!(page_start(2, 3), 0);
        assert_eq!(page_start(3, 3), 3);
        assert_eq!(page_start(5, 3), 3);
        assert_eq!(page_start(5, 4), 4);
    }
}
