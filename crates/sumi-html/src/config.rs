//! Parser configuration.

use bitflags::bitflags;

bitflags! {
    /// Switches that change how the tree builder interprets markup.
    ///
    /// The default is [`ParsingFlags::empty`]: scripting disabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParsingFlags: u8 {
        /// [§ 13.2.6 The scripting flag](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
        ///
        /// When set, `<noscript>` and `<noembed>` contents are raw text.
        /// When clear, `<noscript>` in the head switches to the "in head
        /// noscript" insertion mode and both elements hold ordinary markup
        /// in the body.
        const SCRIPTING = 1 << 0;
    }
}

impl ParsingFlags {
    /// Whether the scripting flag is set.
    #[must_use]
    pub const fn scripting(self) -> bool {
        self.contains(Self::SCRIPTING)
    }
}
