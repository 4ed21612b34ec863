//! Waiting dialogues - localized filler lines shown while a segment is
//! still generating.

use rand::seq::SliceRandom;

use paperstage_domain::{WaitingContext, WaitingDialogue};

/// The built-in filler lines, keyed by narrative context and locale.
fn builtin_pool() -> Vec<WaitingDialogue> {
    use WaitingContext::*;
    [
        (Generating, "en", "Give me a moment, I'm still putting this part together..."),
        (Generating, "en", "The next chapter is still taking shape. Shall we recap?"),
        (Generating, "en", "Hold on, I'm reading ahead so I can explain it properly."),
        (Loading, "en", "Fetching the scene..."),
        (Loading, "en", "One second, setting the stage."),
        (Transition, "en", "And with that, let's move on."),
        (Transition, "en", "That wraps this part up. Onwards!"),
        (Generating, "zh", "稍等一下，这部分内容还在准备中……"),
        (Generating, "zh", "下一章还在生成，我们先回顾一下刚才的内容？"),
        (Loading, "zh", "正在加载场景……"),
        (Transition, "zh", "那么，我们继续吧。"),
    ]
    .into_iter()
    .map(|(context, locale, text)| WaitingDialogue::new(context, locale, text))
    .collect()
}

/// A small fixed pool of waiting dialogues with uniform random selection.
pub struct WaitingDialoguePool {
    entries: Vec<WaitingDialogue>,
    enabled: bool,
}

impl WaitingDialoguePool {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: builtin_pool(),
            enabled,
        }
    }

    /// Replace the built-in entries, e.g. with caller-supplied localization.
    pub fn with_entries(mut self, entries: Vec<WaitingDialogue>) -> Self {
        self.entries = entries;
        self
    }

    /// Pick one line uniformly at random among entries matching the context
    /// and locale. Falls back to context-only matches when the locale has no
    /// entries; `None` when disabled or nothing matches.
    pub fn pick(&self, context: WaitingContext, locale: &str) -> Option<&WaitingDialogue> {
        if !self.enabled {
            return None;
        }
        let mut rng = rand::thread_rng();

        let localized: Vec<&WaitingDialogue> = self
            .entries
            .iter()
            .filter(|d| d.context == context && d.locale == locale)
            .collect();
        if !localized.is_empty() {
            return localized.choose(&mut rng).copied();
        }

        let by_context: Vec<&WaitingDialogue> = self
            .entries
            .iter()
            .filter(|d| d.context == context)
            .collect();
        by_context.choose(&mut rng).copied()
    }
}
