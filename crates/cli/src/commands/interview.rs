//! `crowdwiz interview`: The challenge wizard in the terminal.
//!
//! Keeps the history locally, appending a stage marker after every reply
//! that asked a stage question, the same way the web front-end does.

use std::io::Write;
use std::sync::Arc;

use crowdwiz_config::AppConfig;
use crowdwiz_core::{
    build_narrative_prompt, build_prompt, extract_answers, ConversationStore, GenerateRequest,
    Progress, Provider, Turn,
};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// One generated reply and the stage it asked about.
#[derive(Debug)]
pub struct Reply {
    pub text: String,
    pub stage: Progress,
}

/// A single terminal interview.
pub struct Interview {
    provider: Arc<dyn Provider>,
    store: Arc<dyn ConversationStore>,
    model: String,
    temperature: f32,
    history: Vec<Turn>,
}

impl Interview {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn ConversationStore>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            store,
            model: model.into(),
            temperature,
            history: Vec::new(),
        }
    }

    /// Send one user message and record the exchange.
    ///
    /// The history is only extended once generation succeeds, so a failed
    /// turn can be retried.
    pub async fn respond(&mut self, input: &str) -> crowdwiz_core::Result<Reply> {
        let assembled = build_prompt(input, &self.history)?;
        let request = GenerateRequest::new(&self.model, assembled.prompt)
            .with_temperature(self.temperature);
        let generated = self.provider.generate(request).await?;

        if let Err(e) = self.store.append(input, &generated.text).await {
            warn!(error = %e, "Failed to persist conversation turn");
        }

        self.history.push(Turn::user(input));
        self.history.push(Turn::assistant(&generated.text));
        if let Some(stage) = assembled.stage.stage() {
            self.history.push(Turn::marker(stage));
        }
        debug!(stage = %assembled.stage, turns = self.history.len(), "Turn recorded");

        Ok(Reply {
            text: generated.text,
            stage: assembled.stage,
        })
    }

    /// Generate the promotional narrative from the answers so far.
    pub async fn narrative(&self) -> crowdwiz_core::Result<String> {
        let answers = extract_answers(&self.history)?;
        let request = GenerateRequest::new(&self.model, build_narrative_prompt(&answers))
            .with_temperature(self.temperature);
        Ok(self.provider.generate(request).await?.text)
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}

pub async fn run(with_narrative: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let router = crowdwiz_providers::router::build_from_config(&config);
    let provider = router.default()?;
    let store = crowdwiz_store::build_from_config(&config.store).await?;
    let model = config.model_for(&config.default_provider);

    println!();
    println!("  CrowdWiz — Challenge Interview");
    println!("  Provider:  {} ({model})", config.default_provider);
    println!("  Type your answers and press Enter. Type 'exit' to quit.");
    println!();
    println!("  Wizard > Welcome! Tell me about the challenge you want to run.");

    let mut interview = Interview::new(provider, store, model, config.default_temperature);
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("\n  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        eprint!("  ...");
        let result = interview.respond(input).await;
        eprint!("\r     \r");

        match result {
            Ok(reply) => {
                println!("  Wizard [{}] > {}", reply.stage, reply.text);

                if reply.stage.is_complete() && with_narrative {
                    println!("\n  Writing your challenge narrative...\n");
                    match interview.narrative().await {
                        Ok(narrative) => {
                            println!("{narrative}\n");
                            break;
                        }
                        Err(e) => eprintln!("  Error: {e}"),
                    }
                }
            }
            Err(e) => eprintln!("  Error: {e}"),
        }
    }

    debug!(turns = interview.history().len(), "Interview ended");
    Ok(())
}
