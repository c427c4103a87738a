//! Fallback strategies used when the completion capability is unavailable
//!
//! Both are backed by fixed tables: curated topic answers keyed by keyword
//! and language, and per-category failure notices keyed by language.

use async_trait::async_trait;

use super::strategy::{AnswerInput, AnswerStrategy, StrategyOutcome, Unavailable};
use crate::error::{CompletionFailure, FailureCategory};
use crate::types::LanguageTag;

/// A curated answer for one recognizable subject
#[derive(Debug)]
pub struct CannedTopic {
    /// Topic identifier
    pub topic: &'static str,
    /// Lowercase substrings that identify the topic in a question
    pub keywords: &'static [&'static str],
    /// `(language code, answer)` pairs
    pub answers: &'static [(&'static str, &'static str)],
}

/// Built-in topics, matched in order
pub const CANNED_TOPICS: &[CannedTopic] = &[
    CannedTopic {
        topic: "swaminarayan",
        keywords: &["swaminarayan", "ghanshyam", "સ્વામિનારાયણ", "સ્વામીનારાયણ", "स्वामीनारायण"],
        answers: &[
            (
                "gu",
                "Swaminarayan Bhagwan no janma 3 April 1781 ma Chhapaiya gaame thayo hato. Temnun asli naam Ghanshyam Pande hatu.",
            ),
            (
                "en",
                "Swaminarayan Bhagwan was born on 3 April 1781 in the village of Chhapaiya. His birth name was Ghanshyam Pande.",
            ),
            (
                "hi",
                "स्वामीनारायण भगवान का जन्म 3 अप्रैल 1781 को छपैया गाँव में हुआ था। उनका मूल नाम घनश्याम पांडे था।",
            ),
        ],
    },
    CannedTopic {
        topic: "chhapaiya",
        keywords: &["chhapaiya", "chapaiya", "છપૈયા", "छपैया"],
        answers: &[
            (
                "gu",
                "Chhapaiya ek nanu gaamu che je Uttar Pradesh, Bharat ma aavelu che. Ahin Swaminarayan Bhagwan no janma thayo hato.",
            ),
            (
                "en",
                "Chhapaiya is a small village in Uttar Pradesh, India. Swaminarayan Bhagwan was born there.",
            ),
            (
                "hi",
                "छपैया भारत के उत्तर प्रदेश में स्थित एक छोटा गाँव है। यहीं स्वामीनारायण भगवान का जन्म हुआ था।",
            ),
        ],
    },
];

/// Lookup table over canned topics
pub struct CannedAnswers {
    topics: &'static [CannedTopic],
    fallback: LanguageTag,
}

impl CannedAnswers {
    /// Table over the built-in topics
    pub fn new(fallback: LanguageTag) -> Self {
        Self::with_topics(CANNED_TOPICS, fallback)
    }

    pub fn with_topics(topics: &'static [CannedTopic], fallback: LanguageTag) -> Self {
        Self { topics, fallback }
    }

    /// First topic whose keyword appears in the question
    pub fn match_topic(&self, question: &str) -> Option<&'static CannedTopic> {
        let lower = question.to_lowercase();
        self.topics
            .iter()
            .find(|topic| topic.keywords.iter().any(|k| lower.contains(k)))
    }

    /// Canned answer in the requested language, else in the fallback language
    pub fn lookup(&self, question: &str, language: &LanguageTag) -> Option<&'static str> {
        let topic = self.match_topic(question)?;
        let find = |code: &str| {
            topic
                .answers
                .iter()
                .find(|(lang, _)| *lang == code)
                .map(|(_, answer)| *answer)
        };
        find(language.as_str()).or_else(|| find(self.fallback.as_str()))
    }
}

#[async_trait]
impl AnswerStrategy for CannedAnswers {
    fn name(&self) -> &str {
        "canned-topic"
    }

    fn is_fallback(&self) -> bool {
        true
    }

    async fn attempt(
        &self,
        input: &AnswerInput,
        _: Option<&CompletionFailure>,
    ) -> StrategyOutcome {
        match self.lookup(&input.question, &input.language) {
            Some(answer) => StrategyOutcome::Success(answer.to_string()),
            None => StrategyOutcome::Unavailable(Unavailable::NotApplicable),
        }
    }
}

/// User-facing messages for each failure category in one language
#[derive(Debug)]
pub struct Notices {
    pub misconfigured: &'static str,
    pub rate_limited: &'static str,
    pub transient: &'static str,
}

impl Notices {
    pub fn for_category(&self, category: FailureCategory) -> &'static str {
        match category {
            FailureCategory::Misconfigured => self.misconfigured,
            FailureCategory::RateLimited => self.rate_limited,
            FailureCategory::Transient => self.transient,
        }
    }
}

/// Failure notices by language code; English must be present
pub const FAILURE_NOTICES: &[(&str, Notices)] = &[
    (
        "en",
        Notices {
            misconfigured: "The answer service is not configured correctly (missing or invalid API key). Please contact the administrator.",
            rate_limited: "The answer service is busy right now (rate limit reached). Please wait a moment and try again.",
            transient: "I encountered an error while generating the answer. Please try again.",
        },
    ),
    (
        "gu",
        Notices {
            misconfigured: "જવાબ સેવા યોગ્ય રીતે ગોઠવાયેલ નથી (API કી ખૂટે છે અથવા અમાન્ય છે). કૃપા કરીને સંચાલકનો સંપર્ક કરો.",
            rate_limited: "જવાબ સેવા અત્યારે વ્યસ્ત છે. કૃપા કરીને થોડી વાર પછી ફરી પ્રયાસ કરો.",
            transient: "જવાબ બનાવતી વખતે ભૂલ આવી. કૃપા કરીને ફરી પ્રયાસ કરો.",
        },
    ),
    (
        "hi",
        Notices {
            misconfigured: "उत्तर सेवा सही तरीके से कॉन्फ़िगर नहीं है (API कुंजी गायब या अमान्य है)। कृपया व्यवस्थापक से संपर्क करें।",
            rate_limited: "उत्तर सेवा अभी व्यस्त है। कृपया थोड़ी देर बाद फिर से प्रयास करें।",
            transient: "उत्तर बनाते समय एक त्रुटि हुई। कृपया फिर से प्रयास करें।",
        },
    ),
    (
        "es",
        Notices {
            misconfigured: "El servicio de respuestas no está configurado correctamente (clave de API ausente o no válida). Contacte al administrador.",
            rate_limited: "El servicio de respuestas está ocupado en este momento. Espere un momento e inténtelo de nuevo.",
            transient: "Se produjo un error al generar la respuesta. Inténtelo de nuevo.",
        },
    ),
    (
        "fr",
        Notices {
            misconfigured: "Le service de réponse n'est pas correctement configuré (clé API manquante ou invalide). Veuillez contacter l'administrateur.",
            rate_limited: "Le service de réponse est saturé pour le moment. Veuillez patienter un instant puis réessayer.",
            transient: "Une erreur s'est produite lors de la génération de la réponse. Veuillez réessayer.",
        },
    ),
];

/// Last stage: always answers with the notice for the failure category
pub struct FailureNotice {
    fallback: LanguageTag,
}

impl FailureNotice {
    pub fn new(fallback: LanguageTag) -> Self {
        Self { fallback }
    }

    /// Notice in the requested language, else the fallback language, else English
    pub fn message(&self, category: FailureCategory, language: &LanguageTag) -> &'static str {
        let find = |code: &str| {
            FAILURE_NOTICES
                .iter()
                .find(|(lang, _)| *lang == code)
                .map(|(_, notices)| notices)
        };

        find(language.as_str())
            .or_else(|| find(self.fallback.as_str()))
            .or_else(|| find("en"))
            .map(|notices| notices.for_category(category))
            .unwrap_or("Please try again.")
    }
}

#[async_trait]
impl AnswerStrategy for FailureNotice {
    fn name(&self) -> &str {
        "failure-notice"
    }

    fn is_fallback(&self) -> bool {
        true
    }

    async fn attempt(
        &self,
        input: &AnswerInput,
        cause: Option<&CompletionFailure>,
    ) -> StrategyOutcome {
        let category = cause
            .map(CompletionFailure::category)
            .unwrap_or(FailureCategory::Transient);
        StrategyOutcome::Success(self.message(category, &input.language).to_string())
    }
}
