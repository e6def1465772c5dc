//! Operational errors: conditions the tree constructor cannot recover from
//! by itself, as opposed to [`crate::token::ParseErrorCode`], which is just
//! data describing a tolerated malformation.
//!
//! Grounded on the reference's own `html_processor/errors.rs`
//! (`HtmlProcessorError`/`UnsupportedException`), kept as a manual
//! `std::error::Error` impl rather than reached for `thiserror` — the
//! reference never pulls in a derive-macro error crate for this, and the
//! variant list is small and stable enough not to need one.
//!
//! @see https://html.spec.whatwg.org/#parsing

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TreeBuilderError {
    Unsupported(Unsupported),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Unsupported {
    FosterParentingWithoutTable,
    AdoptionAgencyCannotExtractCommonAncestor,
    ContentOutsideOfHtml,
    ContentOutsideOfBody,
    CannotCloseFormWithOtherElementsOpen,
}

impl Unsupported {
    fn message(self) -> &'static str {
        match self {
            Unsupported::FosterParentingWithoutTable => {
                "cannot foster-parent content with no table on the stack of open elements"
            }
            Unsupported::AdoptionAgencyCannotExtractCommonAncestor => {
                "adoption agency algorithm could not find a common ancestor"
            }
            Unsupported::ContentOutsideOfHtml => "content appeared outside of the html element",
            Unsupported::ContentOutsideOfBody => "content appeared outside of the body element",
            Unsupported::CannotCloseFormWithOtherElementsOpen => {
                "cannot implicitly close a form element with other elements still open"
            }
        }
    }
}

impl fmt::Display for TreeBuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeBuilderError::Unsupported(u) => f.write_str(u.message()),
        }
    }
}

impl std::error::Error for TreeBuilderError {}
