use crate::{Config, Cursor, Result};

use keyset_core::Error;

/// Relay pagination arguments of one connection field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationArgs {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub after: Option<Cursor>,
    pub before: Option<Cursor>,
}

/// Direction storage is read in, relative to the client-facing order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scan {
    Forward,
    Backward,
}

impl PaginationArgs {
    /// Checks the arguments before any query is issued.
    pub fn validate(&self, config: &Config) -> Result<()> {
        if self.first.is_some() && self.last.is_some() {
            return Err(Error::invalid_argument(
                "passing both `first` and `last` to paginate a connection is not supported",
            ));
        }

        for (name, count) in [("first", self.first), ("last", self.last)] {
            let Some(count) = count else { continue };

            if count < 0 {
                return Err(Error::invalid_argument(format!(
                    "`{name}` on a connection cannot be less than zero"
                )));
            }

            if let Some(max) = config.max_page_size {
                if count as u64 > max {
                    return Err(Error::invalid_argument(format!(
                        "`{name}` of {count} exceeds the maximum page size of {max}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// `first` reads forward and `last` reads backward. Without either,
    /// a lone `before` cursor reads backward from it; anything else reads
    /// forward.
    pub fn scan(&self) -> Scan {
        if self.first.is_some() {
            Scan::Forward
        } else if self.last.is_some()
            || (self.before.is_some() && self.after.is_none())
        {
            Scan::Backward
        } else {
            Scan::Forward
        }
    }

    /// Number of edges requested, falling back to the configured default.
    pub fn page_size(&self, config: &Config) -> Option<u64> {
        match self.first.or(self.last) {
            Some(count) => Some(count.max(0) as u64),
            None => config.default_page_size,
        }
    }

    /// Returns `true` if any pagination argument was given.
    pub fn is_paginated(&self) -> bool {
        self.first.is_some() || self.last.is_some() || self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if either cursor was given.
    pub fn has_cursor(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }
}
