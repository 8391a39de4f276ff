//! Fixed-purpose page filters applied by list blocks.

use std::borrow::Borrow;

use crate::date::parse_date;
use crate::record::{fields, PageRecord};
use crate::value::Timestamp;

/// Keeps pages whose `path` starts with `folder_path`.
///
/// The test is a literal, case-sensitive prefix: `"/blog"` also keeps
/// `"/blog-archive/x"`, and `"/blog/"` does not keep `"/blog"` itself.
/// Pages without a `path` are dropped.
pub fn page_filter_by_folder<P, I>(pages: I, folder_path: &str) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    pages
        .into_iter()
        .filter(|page| {
            page.borrow()
                .text(fields::PATH)
                .is_some_and(|path| path.starts_with(folder_path))
        })
        .collect()
}

/// Removes pages whose `robots` field is a non-empty string.
pub fn filter_out_no_index_pages<P, I>(pages: I) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    pages
        .into_iter()
        .filter(|page| {
            page.borrow()
                .text(fields::ROBOTS)
                .map_or(true, |robots| robots.is_empty())
        })
        .collect()
}

/// Removes event pages whose `offDateTime` has passed.
///
/// See [`filter_out_past_events_at`].
pub fn filter_out_past_events<P, I>(pages: I) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    filter_out_past_events_at(pages, Timestamp::now())
}

/// Removes pages whose `offDateTime` is strictly before `now`.
///
/// Pages with an absent or empty `offDateTime` are kept. A present value
/// that does not parse as a date removes the page.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{filter_out_past_events_at, PageRecord, Timestamp};
///
/// let pages = vec![
///     PageRecord::new().with("offDateTime", "2000-01-01"),
///     PageRecord::new().with("title", "evergreen"),
/// ];
/// let now = Timestamp::from_secs(1_700_000_000);
/// assert_eq!(filter_out_past_events_at(&pages, now).len(), 1);
/// ```
pub fn filter_out_past_events_at<P, I>(pages: I, now: Timestamp) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    pages
        .into_iter()
        .filter(|page| match page.borrow().text(fields::OFF_DATE_TIME) {
            None => true,
            Some(off) if off.trim().is_empty() => true,
            Some(off) => match parse_date(&off) {
                Some(off) => off >= now,
                None => {
                    tracing::debug!(
                        op = "filter_out_past_events",
                        off_date_time = %off,
                        "unparsable offDateTime, dropping page",
                    );
                    false
                }
            },
        })
        .collect()
}
