// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Setup errors.

use alloc::string::String;
use core::fmt;

/// Error returned when a reorderable list cannot be set up.
///
/// Setup errors never escape as panics: [`DragController::new`] logs them and
/// yields no controller, while [`DragController::try_new`] hands them back.
///
/// [`DragController::new`]: crate::DragController::new
/// [`DragController::try_new`]: crate::DragController::try_new
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// The item selector is empty.
    EmptyItemSelector,
    /// A handle selector was configured but is empty.
    EmptyHandleSelector,
    /// The list root selector matched nothing.
    RootNotFound {
        /// The selector that was looked up.
        selector: String,
    },
    /// The list root selector matched more than one element.
    AmbiguousRoot {
        /// The selector that was looked up.
        selector: String,
        /// How many elements matched.
        matches: usize,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItemSelector => write!(f, "expected a non-empty list item selector"),
            Self::EmptyHandleSelector => write!(f, "expected a non-empty handle selector"),
            Self::RootNotFound { selector } => {
                write!(f, "list root selector {selector:?} matched no element")
            }
            Self::AmbiguousRoot { selector, matches } => write!(
                f,
                "list root selector {selector:?} matched {matches} elements, expected exactly one"
            ),
        }
    }
}

impl core::error::Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_selector() {
        let err = SetupError::AmbiguousRoot {
            selector: ".js-list".into(),
            matches: 2,
        };
        assert_eq!(
            err.to_string(),
            "list root selector \".js-list\" matched 2 elements, expected exactly one"
        );
    }
}
