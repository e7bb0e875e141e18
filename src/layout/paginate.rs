//! Priority-aware pagination
//!
//! The priority-ordered sequence (boosted first, then normal) is cut into
//! zones of `items_per_page` slots. Page one only ever shows boosted
//! bubbles - it is never backfilled with normals. When the boosted set is
//! smaller than a page, the normals sharing its zone move to page two; when
//! boosted overflow spills into the second zone, that overflow leads page
//! two and is backfilled with normals, with later normal pages offset
//! accordingly.

use super::bubble::{Bubble, Tier};

/// One visible page of the bubble set
#[derive(Debug, Clone)]
pub struct Page {
    /// Bubbles visible on the requested page, in priority order
    pub visible: Vec<Bubble>,
    /// Total page count for the whole set
    pub total_pages: usize,
}

/// Slice the priority-ordered `ordered` set into the requested page.
///
/// `ordered` must already be in priority order (boosted prefix); `page` is
/// 1-indexed and values past the end yield an empty page. Pure - bubbles
/// are cloned out, nothing is mutated.
pub fn paginate(ordered: &[Bubble], items_per_page: usize, page: usize) -> Page {
    let k = items_per_page.max(1);
    let page = page.max(1);

    let boosted = ordered
        .iter()
        .take_while(|bubble| bubble.tier == Tier::Boosted)
        .count();
    let normal = ordered.len() - boosted;
    let normals = &ordered[boosted..];

    if ordered.is_empty() {
        return Page {
            visible: Vec::new(),
            total_pages: 0,
        };
    }

    // Zones: fixed k-slot windows over the combined sequence
    let zones = ordered.len().div_ceil(k);
    // A boosted set smaller than one page shares zone one with normals;
    // that zone splits into a boosted-only page and a normal page
    let split_first_zone = boosted > 0 && boosted < k && normal > 0;
    let total_pages = if split_first_zone { zones + 1 } else { zones };

    let visible: Vec<Bubble> = if split_first_zone {
        if page == 1 {
            ordered[..boosted].to_vec()
        } else {
            // Page p shows zone p-1 with the boosted prefix removed
            let zone = page - 2;
            let start = (zone * k).saturating_sub(boosted).min(normal);
            let end = ((zone + 1) * k - boosted).min(normal);
            normals[start..end.max(start)].to_vec()
        }
    } else {
        // Pages map one-to-one onto zones; an overflow zone leads with its
        // boosted remainder and backfills with normals
        let lo = (page - 1) * k;
        let hi = page * k;
        let boosted_part = &ordered[lo.min(boosted)..hi.min(boosted)];
        let normal_part = &normals[lo.saturating_sub(boosted).min(normal)
            ..hi.saturating_sub(boosted).min(normal)];
        boosted_part
            .iter()
            .chain(normal_part.iter())
            .cloned()
            .collect()
    };

    Page {
        visible,
        total_pages,
    }
}
