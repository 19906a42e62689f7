use std::sync::Arc;

use super::ServiceError;
use crate::llm::TextGenerator;
use crate::models::{AnalysisResponse, BookmarkedPaper, NoteAnalysisRequest};

const PERSONA: &str = "You are an expert in research and development. \
Analyse the experiment notebook below and advise, from a physical and chemical point of view, \
which experiment should be tried next and how the data should be interpreted.";

/// Asks the text generator for three pieces of advice on a note
#[derive(Debug, Clone)]
pub struct AdviceGenerator {
    generator: Arc<dyn TextGenerator>,
    language: String,
}

impl AdviceGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, language: impl Into<String>) -> Self {
        Self {
            generator,
            language: language.into(),
        }
    }

    /// Build the single prompt sent to the model.
    pub fn build_prompt(&self, text: &str, papers: &[BookmarkedPaper]) -> String {
        let titles = papers
            .iter()
            .map(|p| p.title().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{persona}\n\n\
             [Experiment notebook]\n{text}\n\n\
             [Saved reference papers]\n{titles}\n\n\
             Answer in {language} with exactly three concise bullet points.",
            persona = PERSONA,
            text = text,
            titles = titles,
            language = self.language,
        )
    }

    /// Return the model's raw answer for the note.
    pub async fn analyze(&self, request: &NoteAnalysisRequest) -> Result<String, ServiceError> {
        let prompt = self.build_prompt(&request.text, &request.bookmarked_papers);
        tracing::info!(
            model = self.generator.model(),
            bookmarks = request.bookmarked_papers.len(),
            "Analysing note"
        );
        let analysis = self.generator.generate(&prompt).await?;
        tracing::info!(chars = analysis.len(), "Note analysis complete");
        Ok(analysis)
    }

    /// Like [`AdviceGenerator::analyze`], with failures reported in the body.
    pub async fn respond(&self, request: &NoteAnalysisRequest) -> AnalysisResponse {
        match self.analyze(request).await {
            Ok(analysis) => AnalysisResponse::Analysis { analysis },
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Note analysis failed");
                AnalysisResponse::Error {
                    error: e.to_string(),
                }
            }
        }
    }
}
