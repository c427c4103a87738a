//! Question pipeline: resolve language, assemble context, answer

use crate::error::Result;
use crate::generation::AnswerGenerator;
use crate::language::LanguageResolver;
use crate::retrieval::ContextAssembler;
use crate::types::{AnswerResult, Question};

/// Runs one question through resolution, context assembly and generation
pub struct QuestionPipeline {
    resolver: LanguageResolver,
    assembler: ContextAssembler,
    generator: AnswerGenerator,
}

impl QuestionPipeline {
    pub fn new(
        resolver: LanguageResolver,
        assembler: ContextAssembler,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            resolver,
            assembler,
            generator,
        }
    }

    /// Answer a validated question
    ///
    /// Only context assembly can fail (unknown document id); language
    /// resolution and generation always produce a value.
    pub async fn ask(&self, question: Question) -> Result<AnswerResult> {
        let language = self.resolver.resolve(&question.text, &question.language_hint).await;
        let context = self.assembler.build_context(&question.selector)?;

        tracing::debug!(
            "Question resolved to '{}' with {} context chars",
            language,
            context.char_len()
        );

        Ok(self.generator.answer(&question.text, context, language).await)
    }
}
