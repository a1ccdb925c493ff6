use serde::{Deserialize, Serialize};

use crate::error::Res;

use super::LlmClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInsight {
    pub fun_fact: String,
    pub known_for: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradition: Option<String>,
}

fn prompt(city: &str, weather: Option<&str>) -> String {
    let weather = weather
        .filter(|w| !w.trim().is_empty())
        .map(|w| format!(" The weather there right now: {w}."))
        .unwrap_or_default();
    format!(
        r#"For the city "{city}", provide:{weather}
1. A fun fact about its history or culture (2 sentences max)
2. A famous landmark or attraction (2 sentences max)
3. A unique local tradition or cultural aspect (2 sentences max)

Format the response as JSON with these keys:
{{
  "funFact": "🏛️ [fun historical fact]",
  "knownFor": "🗺️ [landmark/attraction]",
  "tradition": "🎉 [local tradition]"
}}

Make the insights interesting and engaging. Add relevant emojis at the start of each fact."#
    )
}

impl LlmClient {
    /// Three short facts about `city`, optionally tuned to its weather.
    pub async fn city_insights(&self, city: &str, weather: Option<&str>) -> Res<CityInsight> {
        self.complete_json(&prompt(city, weather)).await
    }
}
