//! Fills marketing prompt templates, calls the chosen vendor and
//! shapes the reply. Structured replies (emails, personas) degrade to fixed
//! fallbacks when the model does not return the requested JSON.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::analyzer::AnalysisResult;
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, ApiKeys, LlmClient, Provider};
use crate::marketing::prompts::{
    CHAT_SYSTEM, CHAT_WITH_CONTEXT_PROMPT, CONTENT_PROMPT_TEMPLATE, CONTENT_SYSTEM_TEMPLATE,
    EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM_TEMPLATE, PERSONA_PROMPT_TEMPLATE, PERSONA_SYSTEM,
};

pub const DEFAULT_PLATFORM: &str = "general";

/// A generated email campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub content: String,
    pub html: String,
}

/// A customer persona, as requested from the model.
///
/// Decoding is forgiving: absent fields are empty and scalar fields accept
/// numbers or booleans (models often answer `"age": 34`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Persona {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub avatar: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub income: String,
    #[serde(deserialize_with = "lenient_string")]
    pub education: String,
    #[serde(deserialize_with = "lenient_list")]
    pub goals: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub pain_points: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub solutions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub characteristics: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub tech_comfort: String,
    #[serde(deserialize_with = "lenient_string")]
    pub decision_making: String,
    #[serde(deserialize_with = "lenient_string")]
    pub communication: String,
    #[serde(deserialize_with = "lenient_string")]
    pub work_style: String,
}

impl Persona {
    /// Returned when the model reply is not a usable persona.
    pub fn fallback() -> Self {
        fn list(items: [&str; 4]) -> Vec<String> {
            items.into_iter().map(str::to_string).collect()
        }

        Persona {
            name: "Generated Persona".into(),
            role: "Target Customer".into(),
            company: "Various Industries".into(),
            avatar: "GP".into(),
            age: "25-45 years old".into(),
            location: "United States".into(),
            income: "$50,000 - $100,000".into(),
            education: "College Graduate".into(),
            goals: list([
                "Achieve business growth",
                "Improve efficiency",
                "Stay competitive",
                "Build strong relationships",
            ]),
            pain_points: list([
                "Limited time",
                "Budget constraints",
                "Information overload",
                "Keeping up with trends",
            ]),
            solutions: list([
                "Automation tools",
                "Cost-effective solutions",
                "Simplified processes",
                "Expert guidance",
            ]),
            characteristics: list([
                "Tech-savvy",
                "Results-oriented",
                "Values quality",
                "Seeks recommendations",
            ]),
            tech_comfort: "High".into(),
            decision_making: "Research-based".into(),
            communication: "Email and video calls".into(),
            work_style: "Collaborative".into(),
        }
    }
}

/// Binds a vendor client to the caller's keys and chosen provider.
pub struct Generator<'a> {
    llm: &'a LlmClient,
    keys: &'a ApiKeys,
    provider: Provider,
}

impl<'a> Generator<'a> {
    pub fn new(llm: &'a LlmClient, keys: &'a ApiKeys, provider: Provider) -> Self {
        Self {
            llm,
            keys,
            provider,
        }
    }

    pub async fn chat_response(&self, message: &str, context: &str) -> Result<String, AppError> {
        self.complete(&chat_prompt(message, context), CHAT_SYSTEM)
            .await
    }

    pub async fn marketing_content(
        &self,
        prompt: &str,
        content_type: &str,
        platform: &str,
        tone: Option<&str>,
        analysis: Option<&AnalysisResult>,
    ) -> Result<String, AppError> {
        let system = fill(
            CONTENT_SYSTEM_TEMPLATE,
            &[("content_type", content_type), ("platform", platform)],
        );
        let user = content_prompt(prompt, content_type, platform, tone, analysis);
        self.complete(&user, &system).await
    }

    pub async fn email_content(
        &self,
        prompt: &str,
        email_type: &str,
        brand_info: &str,
        analysis: Option<&AnalysisResult>,
    ) -> Result<EmailContent, AppError> {
        let system = fill(EMAIL_SYSTEM_TEMPLATE, &[("email_type", email_type)]);
        let url_analysis = analysis_json(analysis);
        let user = fill(
            EMAIL_PROMPT_TEMPLATE,
            &[
                ("email_type", email_type),
                ("brand_info", brand_info),
                ("url_analysis", &url_analysis),
                ("prompt", prompt),
            ],
        );

        let reply = self.complete(&user, &system).await?;
        Ok(parse_email_reply(&reply))
    }

    pub async fn persona(&self, description: &str) -> Result<Persona, AppError> {
        let user = fill(PERSONA_PROMPT_TEMPLATE, &[("description", description)]);
        let reply = self.complete(&user, PERSONA_SYSTEM).await?;
        Ok(parse_persona_reply(&reply))
    }

    async fn complete(&self, prompt: &str, system: &str) -> Result<String, AppError> {
        self.llm
            .generate(self.keys, self.provider, prompt, Some(system))
            .await
            .map_err(|e| AppError::Llm(format!("AI generation failed: {e}")))
    }
}

fn chat_prompt(message: &str, context: &str) -> String {
    if context.is_empty() {
        message.to_string()
    } else {
        fill(
            CHAT_WITH_CONTEXT_PROMPT,
            &[("context", context), ("message", message)],
        )
    }
}

fn content_prompt(
    prompt: &str,
    content_type: &str,
    platform: &str,
    tone: Option<&str>,
    analysis: Option<&AnalysisResult>,
) -> String {
    let url_analysis = analysis_json(analysis);
    let tone_line = tone
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("Preferred Tone: {t}\n"))
        .unwrap_or_default();

    fill(
        CONTENT_PROMPT_TEMPLATE,
        &[
            ("content_type", content_type),
            ("platform", platform),
            ("url_analysis", &url_analysis),
            ("prompt", prompt),
            ("tone_line", &tone_line),
        ],
    )
}

/// Pretty JSON of the analysis, or `null` when there is none.
fn analysis_json(analysis: Option<&AnalysisResult>) -> String {
    analysis
        .and_then(|a| serde_json::to_string_pretty(a).ok())
        .unwrap_or_else(|| "null".to_string())
}

/// Substitutes `{name}` placeholders in a single pass, so inserted values are
/// never themselves scanned for placeholders. Unknown placeholders are kept.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Turns a model reply into an `EmailContent`, filling gaps from the raw reply.
///
/// Any JSON value other than `null` counts as a draft; fields that are not
/// non-empty strings are filled in. Replies that are not JSON at all are
/// wrapped as plain text.
pub fn parse_email_reply(reply: &str) -> EmailContent {
    let draft = match serde_json::from_str::<Value>(strip_json_fences(reply)) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Email reply was not JSON, using raw text: {e}");
            None
        }
    };

    let Some(draft) = draft else {
        return EmailContent {
            subject: "Generated Email Campaign".to_string(),
            content: reply.to_string(),
            html: format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">{}</div>"#,
                reply.replace('\n', "<br>")
            ),
        };
    };

    let field = |name: &str| {
        draft
            .get(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let content = field("content").unwrap_or_else(|| reply.to_string());
    let html = field("html")
        .unwrap_or_else(|| format!(r#"<div style="font-family: Arial, sans-serif;">{content}</div>"#));
    EmailContent {
        subject: field("subject").unwrap_or_else(|| "Generated Email".to_string()),
        content,
        html,
    }
}

/// Parses a persona reply. Replies that do not decode as a persona object yield
/// `Persona::fallback()`.
pub fn parse_persona_reply(reply: &str) -> Persona {
    serde_json::from_str(strip_json_fences(reply)).unwrap_or_else(|e| {
        warn!("Persona reply was not a JSON object, using fallback: {e}");
        Persona::fallback()
    })
}

/// Scalar JSON as text; `null` is empty.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| de::Error::custom("expected a string or number"))
}

/// A list of scalars, a single scalar (one-item list), or `null` (empty).
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| scalar_text(item).ok_or_else(|| de::Error::custom("expected a list of strings")))
            .collect(),
        other => scalar_text(other)
            .map(|s| vec![s])
            .ok_or_else(|| de::Error::custom("expected a list of strings")),
    }
}
