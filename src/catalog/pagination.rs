//! Fixed-size page windows over a filtered list.

use thiserror::Error;

/// Above this many pages the marker strip is compressed with ellipses
const MAX_UNCOMPRESSED_PAGES: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
  #[error("page size must be at least 1")]
  ZeroPageSize,
  #[error("page {page} is out of range (1..={total_pages})")]
  OutOfRange { page: usize, total_pages: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
  Page(usize),
  Ellipsis,
}

/// Position of one page within the whole list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
  pub total_items: usize,
  pub total_pages: usize,
  /// 1-based
  pub current: usize,
  /// 1-based index of the first item on the page, 0 for an empty list
  pub start: usize,
  /// 1-based index of the last item on the page, 0 for an empty list
  pub end: usize,
  pub markers: Vec<PageMarker>,
}

impl PageWindow {
  pub fn has_prev(&self) -> bool {
    self.current > 1
  }

  pub fn has_next(&self) -> bool {
    self.current < self.total_pages
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
  pub items: &'a [T],
  pub window: PageWindow,
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
  if page_size == 0 {
    return 0;
  }
  total_items.div_ceil(page_size)
}

/// Slice out page `page` (1-based). Out-of-range pages are rejected, never
/// clamped; an empty list only has page 1.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Result<Page<'_, T>, PageError> {
  if page_size == 0 {
    return Err(PageError::ZeroPageSize);
  }

  let total_items = items.len();
  let total_pages = total_pages(total_items, page_size);

  if page == 0 || page > total_pages.max(1) {
    return Err(PageError::OutOfRange { page, total_pages });
  }

  let offset = (page - 1) * page_size;
  let end = (offset + page_size).min(total_items);
  let slice = &items[offset.min(end)..end];

  let (start, end) = if slice.is_empty() {
    (0, 0)
  } else {
    (offset + 1, end)
  };

  Ok(Page {
    items: slice,
    window: PageWindow {
      total_items,
      total_pages,
      current: page,
      start,
      end,
      markers: page_markers(total_pages, page),
    },
  })
}

/// Page strip: first, last and the neighbours of `current`, with an
/// ellipsis standing in for every gap.
pub fn page_markers(total_pages: usize, current: usize) -> Vec<PageMarker> {
  if total_pages <= MAX_UNCOMPRESSED_PAGES {
    return (1..=total_pages).map(PageMarker::Page).collect();
  }

  let mut pages = vec![1, total_pages];
  for page in [current.saturating_sub(1), current, current + 1] {
    if (1..=total_pages).contains(&page) {
      pages.push(page);
    }
  }
  pages.sort_unstable();
  pages.dedup();

  let mut markers = Vec::with_capacity(pages.len() * 2);
  let mut prev = 0;
  for page in pages {
    if prev != 0 && page > prev + 1 {
      markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(page));
    prev = page;
  }
  markers
}
