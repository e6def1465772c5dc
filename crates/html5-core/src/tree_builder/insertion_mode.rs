//! The tree constructor's "insertion mode": which of the ~19 WHATWG table
//! rows governs how the current token is handled.
//!
//! @see https://html.spec.whatwg.org/#the-insertion-mode

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertionMode {
    /// @see https://html.spec.whatwg.org/#the-initial-insertion-mode
    Initial,
    /// @see https://html.spec.whatwg.org/#the-before-html-insertion-mode
    BeforeHtml,
    /// @see https://html.spec.whatwg.org/#the-before-head-insertion-mode
    BeforeHead,
    /// @see https://html.spec.whatwg.org/#parsing-main-inhead
    InHead,
    /// @see https://html.spec.whatwg.org/#parsing-main-inheadnoscript
    InHeadNoscript,
    /// @see https://html.spec.whatwg.org/#the-after-head-insertion-mode
    AfterHead,
    /// @see https://html.spec.whatwg.org/#parsing-main-inbody
    InBody,
    /// @see https://html.spec.whatwg.org/#parsing-main-incdata
    Text,
    /// @see https://html.spec.whatwg.org/#parsing-main-intable
    InTable,
    /// @see https://html.spec.whatwg.org/#parsing-main-intabletext
    InTableText,
    /// @see https://html.spec.whatwg.org/#parsing-main-incaption
    InCaption,
    /// @see https://html.spec.whatwg.org/#parsing-main-incolgroup
    InColumnGroup,
    /// @see https://html.spec.whatwg.org/#parsing-main-intbody
    InTableBody,
    /// @see https://html.spec.whatwg.org/#parsing-main-intr
    InRow,
    /// @see https://html.spec.whatwg.org/#parsing-main-intd
    InCell,
    /// @see https://html.spec.whatwg.org/#parsing-main-inselect
    InSelect,
    /// @see https://html.spec.whatwg.org/#parsing-main-inselectintable
    InSelectInTable,
    /// @see https://html.spec.whatwg.org/#parsing-main-intemplate
    InTemplate,
    /// @see https://html.spec.whatwg.org/#the-after-body-insertion-mode
    AfterBody,
    /// @see https://html.spec.whatwg.org/#parsing-main-inframeset
    InFrameset,
    /// @see https://html.spec.whatwg.org/#the-after-frameset-insertion-mode
    AfterFrameset,
    /// @see https://html.spec.whatwg.org/#the-after-after-body-insertion-mode
    AfterAfterBody,
    /// @see https://html.spec.whatwg.org/#the-after-after-frameset-insertion-mode
    AfterAfterFrameset,
}
