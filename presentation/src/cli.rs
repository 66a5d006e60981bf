use crate::conversation_view::ConversationView;
use application::ResponseGenerator;
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use domain::providers::{EmbeddingProvider, GenerationProvider};
use domain::Session;
use infrastructure::config::Config;
use infrastructure::corpus_store::{IndexOrigin, SupportCorpusStore};
use infrastructure::ollama_client::OllamaClient;
use infrastructure::placeholder_config::load_placeholders;
use shared::confirmation::confirm_discard;
use shared::types::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "customer-care-bot")]
#[command(about = "Drafts customer support replies in the style of past best practices")]
pub struct Cli {
    /// CSV of past support responses
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Where the embedded corpus is persisted
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// JSON object of {{placeholder}} values
    #[arg(long)]
    pub placeholders: Option<PathBuf>,

    /// Number of past responses to retrieve per message
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Re-embed the corpus even if a persisted index exists
    #[arg(long)]
    pub rebuild_index: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Customer message for one-shot mode (interactive chat if empty)
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl Cli {
    /// Flags win over environment settings.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(corpus) = &self.corpus {
            config.corpus_path = corpus.clone();
        }
        if let Some(index) = &self.index {
            config.index_path = index.clone();
        }
        if let Some(placeholders) = &self.placeholders {
            config.placeholders_path = placeholders.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
    }
}

fn index_status(origin: IndexOrigin, examples: usize) -> String {
    match origin {
        IndexOrigin::Loaded => {
            format!("Loaded vectors from persisted index ({examples} examples).")
        }
        IndexOrigin::Built => format!("Created and saved vectors to index ({examples} examples)."),
    }
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        cli.apply_to(&mut self.config);
        let client = OllamaClient::new(&self.config)?;

        let rebuild =
            cli.rebuild_index && confirm_discard("the persisted index", cli.yes)?;
        let store = if rebuild {
            SupportCorpusStore::rebuild(
                &self.config.index_path,
                &self.config.corpus_path,
                client.clone(),
            )
            .await?
        } else {
            SupportCorpusStore::load(
                &self.config.index_path,
                &self.config.corpus_path,
                client.clone(),
            )
            .await?
        };
        eprintln!("{}", index_status(store.origin(), store.len()).blue());

        let placeholders = load_placeholders(&self.config.placeholders_path);
        let generator = ResponseGenerator::new(Arc::new(store), client, placeholders)
            .with_top_k(self.config.top_k);
        let mut session = Session::new("cli");

        let message = cli.message.join(" ");
        if message.trim().is_empty() {
            self.handle_chat(&generator, &mut session).await
        } else {
            self.handle_once(&generator, &mut session, &message).await
        }
    }

    async fn handle_chat<E, G>(
        &self,
        generator: &ResponseGenerator<E, G>,
        session: &mut Session,
    ) -> Result<()>
    where
        E: EmbeddingProvider,
        G: GenerationProvider,
    {
        println!("{}", "CustomerCareBot. Type 'exit' to quit.".bold());
        loop {
            let input: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Customer message")
                .allow_empty(true)
                .interact_text()?;
            let input = input.trim();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                break;
            }
            self.submit(generator, session, input).await;
            print!("{}", ConversationView::render(&session.history));
        }
        Ok(())
    }

    async fn handle_once<E, G>(
        &self,
        generator: &ResponseGenerator<E, G>,
        session: &mut Session,
        message: &str,
    ) -> Result<()>
    where
        E: EmbeddingProvider,
        G: GenerationProvider,
    {
        self.submit(generator, session, message).await;
        print!("{}", ConversationView::render(&session.history));
        Ok(())
    }

    /// A failed submission is reported and the session carries on.
    async fn submit<E, G>(
        &self,
        generator: &ResponseGenerator<E, G>,
        session: &mut Session,
        message: &str,
    ) where
        E: EmbeddingProvider,
        G: GenerationProvider,
    {
        eprintln!("{}", "Generating best practice message...".dimmed());
        if let Err(err) = generator.generate(session, message).await {
            tracing::debug!(session = %session.id, %err, "response generation failed");
            eprintln!("{}", ConversationView::render_failure(&err));
        }
    }
}
