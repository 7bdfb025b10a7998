use reelshelf_model::PagingWindowConfig;

/// Decision derived from the first visible item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    Append,
    Prepend,
    Hold,
}

/// Index thresholds that trigger loading around the resident window.
///
/// With a full window of `W` items, reaching the last third (`W - W/3`)
/// appends and moving into the first third (`W/3`, exclusive of index 0)
/// prepends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollThresholds {
    pub prepend_fetch_limit: usize,
    pub append_fetch_limit: usize,
}

impl ScrollThresholds {
    pub fn from_config(config: &PagingWindowConfig) -> Self {
        let total = config.total_window_size();
        Self {
            prepend_fetch_limit: total / 3,
            append_fetch_limit: total - total / 3,
        }
    }

    pub fn decide(&self, first_visible_index: usize) -> ScrollAction {
        if first_visible_index >= self.append_fetch_limit {
            ScrollAction::Append
        } else if first_visible_index > 0
            && first_visible_index < self.prepend_fetch_limit
        {
            ScrollAction::Prepend
        } else {
            ScrollAction::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_split_the_window_in_thirds() {
        let config = PagingWindowConfig::new(20, 3).unwrap();
        let thresholds = ScrollThresholds::from_config(&config);

        assert_eq!(thresholds.prepend_fetch_limit, 20);
        assert_eq!(thresholds.append_fetch_limit, 40);

        assert_eq!(thresholds.decide(0), ScrollAction::Hold);
        assert_eq!(thresholds.decide(1), ScrollAction::Prepend);
        assert_eq!(thresholds.decide(19), ScrollAction::Prepend);
        assert_eq!(thresholds.decide(20), ScrollAction::Hold);
        assert_eq!(thresholds.decide(39), ScrollAction::Hold);
        assert_eq!(thresholds.decide(40), ScrollAction::Append);
        assert_eq!(thresholds.decide(45), ScrollAction::Append);
    }
}
