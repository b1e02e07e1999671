//! Keyword routing from a raw utterance to the prompt sent to the backend.

/// A routing rule: if the utterance contains any of `markers`, `template` is used as the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptRule {
    pub name: &'static str,
    pub markers: &'static [&'static str],
    pub template: &'static str,
}

pub const OVERSEAS_MARKET_PROMPT: &str = "오늘 미국 증시가 개장했는지 휴장했는지 먼저 알려주고, \
다우존스, S&P 500, 나스닥 지수의 최근 흐름을 짧게 요약해줘.";

pub const DOMESTIC_MARKET_PROMPT: &str = "오늘 한국 증시가 개장했는지 휴장했는지 먼저 알려주고, \
코스피와 코스닥 지수의 최근 흐름을 짧게 요약해줘.";

/// Evaluated top to bottom; the first matching rule wins.
pub const RULES: &[PromptRule] = &[
    PromptRule {
        name: "overseas_market",
        markers: &["미주"],
        template: OVERSEAS_MARKET_PROMPT,
    },
    PromptRule {
        name: "domestic_market",
        markers: &["국장", "국내 증시"],
        template: DOMESTIC_MARKET_PROMPT,
    },
];

impl PromptRule {
    pub fn matches(&self, utterance: &str) -> bool {
        self.markers.iter().any(|marker| utterance.contains(marker))
    }
}

/// Returns the first rule matching `utterance`, if any.
pub fn matching_rule(utterance: &str) -> Option<&'static PromptRule> {
    RULES.iter().find(|rule| rule.matches(utterance))
}

/// Maps an utterance to a prompt. Unmatched utterances pass through untouched.
pub fn select_prompt(utterance: &str) -> String {
    match matching_rule(utterance) {
        Some(rule) => {
            tracing::debug!("Utterance routed to '{}' prompt", rule.name);
            rule.template.to_string()
        }
        None => utterance.to_string(),
    }
}
