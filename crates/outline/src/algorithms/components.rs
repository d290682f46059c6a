use tracing::debug;

use super::neighbors4;
use crate::{error::Result, traits::MaskFilter, types::ForegroundMask};

/// Per-pixel component ids (`0` = background) and the size of each id.
/// `sizes[0]` is unused.
#[derive(Debug, Clone)]
pub struct ComponentLabels {
    pub labels: Vec<u32>,
    pub sizes: Vec<usize>,
}

impl ComponentLabels {
    pub fn count(&self) -> usize {
        self.sizes.len().saturating_sub(1)
    }

    /// Label with the most pixels. Ties go to the label found first in
    /// row-major order.
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (label, &size) in self.sizes.iter().enumerate().skip(1) {
            if best.is_none_or(|(_, best_size)| size > best_size) {
                best = Some((label as u32, size));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Label 4-connected foreground components with an explicit stack
pub fn label_components(mask: &ForegroundMask) -> ComponentLabels {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let mut labels = vec![0u32; mask.len()];
    let mut sizes = vec![0usize];
    let mut stack: Vec<usize> = Vec::with_capacity(1024);

    for seed in 0..mask.len() {
        if !mask.get(seed) || labels[seed] != 0 {
            continue;
        }

        let label = sizes.len() as u32;
        let mut size = 0usize;
        labels[seed] = label;
        stack.push(seed);

        while let Some(idx) = stack.pop() {
            size += 1;
            for n in neighbors4(idx, width, height) {
                if mask.get(n) && labels[n] == 0 {
                    labels[n] = label;
                    stack.push(n);
                }
            }
        }

        sizes.push(size);
    }

    ComponentLabels { labels, sizes }
}

/// Keeps only the largest 4-connected foreground component
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestComponentFilter;

impl MaskFilter for LargestComponentFilter {
    fn filter(&self, mask: &mut ForegroundMask) -> Result<()> {
        let components = label_components(mask);
        let Some(keep) = components.largest() else {
            debug!("no foreground components");
            return Ok(());
        };

        debug!(
            components = components.count(),
            kept_label = keep,
            kept_size = components.sizes[keep as usize],
            "selected largest foreground component"
        );

        for (idx, &label) in components.labels.iter().enumerate() {
            if label != 0 && label != keep {
                mask.set(idx, false);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "largest-component"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> ForegroundMask {
        let width = rows[0].len() as u32;
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| u8::from(b == b'#')))
            .collect();
        ForegroundMask::from_raw(width, rows.len() as u32, data).expect("Should build mask")
    }

    #[test]
    fn test_diagonal_pixels_are_separate_components() {
        let mask = mask_from_rows(&["#.", ".#"]);
        let components = label_components(&mask);
        assert_eq!(components.count(), 2);
        assert_eq!(components.sizes[1], 1);
        assert_eq!(components.sizes[2], 1);
    }

    #[test]
    fn test_keeps_largest_blob() {
        let mut mask = mask_from_rows(&[
            "##....",
            "##..##",
            "....##",
            "....##",
        ]);
        LargestComponentFilter.filter(&mut mask).expect("Should filter");
        assert_eq!(mask.count_set(), 6);
        assert!(!mask.get(0));
        assert!(mask.get(mask.index_of(5, 3)));
    }

    #[test]
    fn test_tie_keeps_first_in_scan_order() {
        let mut mask = mask_from_rows(&["#.#"]);
        LargestComponentFilter.filter(&mut mask).expect("Should filter");
        assert!(mask.get(0));
        assert!(!mask.get(2));
    }

    #[test]
    fn test_empty_mask_untouched() {
        let mut mask = ForegroundMask::new(5, 5);
        LargestComponentFilter.filter(&mut mask).expect("Should filter");
        assert_eq!(mask.count_set(), 0);
    }

    #[test]
    fn test_large_component_does_not_recurse() {
        let mut mask = ForegroundMask::from_raw(1000, 1000, vec![1; 1_000_000]).expect("Should build mask");
        LargestComponentFilter.filter(&mut mask).expect("Should filter");
        assert_eq!(mask.count_set(), 1_000_000);
    }
}
