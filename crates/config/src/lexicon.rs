//! Keyword lexicon for the task-dependency heuristic
//!
//! All entries are lowercase and matched as case-insensitive substrings.

use serde::{Deserialize, Serialize};

/// Phrases and keywords that suggest later tasks build on earlier ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyLexicon {
    /// A later task containing one of these refers back to an earlier one
    pub dependency_phrases: Vec<String>,
    pub calculation_keywords: Vec<String>,
    pub business_keywords: Vec<String>,
    pub technical_keywords: Vec<String>,
    pub analysis_keywords: Vec<String>,
    /// A later task asking for a decision on top of an analytical first task
    pub decision_keywords: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for DependencyLexicon {
    fn default() -> Self {
        Self {
            dependency_phrases: owned(&[
                "based on",
                "using the",
                "using your",
                "from the above",
                "from your previous",
                "given your",
                "given the above",
                "considering",
                "in light of",
                "according to your",
                "with reference to",
                "building on",
                "following from",
                "your answer to",
                "your previous answer",
                "the previous part",
                "the previous step",
                "as calculated",
                "this result",
                "that result",
            ]),
            calculation_keywords: owned(&[
                "calculate",
                "compute",
                "estimate",
                "how much",
                "how many",
                "break-even",
                "break even",
                "return on investment",
                "npv",
                "growth rate",
                "percentage",
                "average",
            ]),
            business_keywords: owned(&[
                "market",
                "revenue",
                "profit",
                "margin",
                "cost",
                "pricing",
                "budget",
                "forecast",
                "customer",
                "sales",
            ]),
            technical_keywords: owned(&[
                "design",
                "implement",
                "algorithm",
                "complexity",
                "architecture",
                "schema",
                "query",
                "optimize",
                "debug",
                "bottleneck",
            ]),
            analysis_keywords: owned(&[
                "analyze",
                "analyse",
                "assess",
                "evaluate",
                "identify",
                "determine",
                "compare",
                "interpret",
                "examine",
                "investigate",
            ]),
            decision_keywords: owned(&[
                "should",
                "recommend",
                "justify",
                "propose",
                "conclude",
                "decide",
                "suggest",
                "advise",
                "which option",
                "would you choose",
            ]),
        }
    }
}

impl DependencyLexicon {
    /// Calculation, business, technical and general-analysis keywords combined
    pub fn analytical_keywords(&self) -> impl Iterator<Item = &str> {
        self.calculation_keywords
            .iter()
            .chain(&self.business_keywords)
            .chain(&self.technical_keywords)
            .chain(&self.analysis_keywords)
            .map(String::as_str)
    }

    /// Lowercase every entry so matching stays case-insensitive after
    /// user-supplied overrides
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.dependency_phrases,
            &mut self.calculation_keywords,
            &mut self.business_keywords,
            &mut self.technical_keywords,
            &mut self.analysis_keywords,
            &mut self.decision_keywords,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
            list.retain(|entry| !entry.is_empty());
        }
        self
    }
}
