//! The `recite quiz` command.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use recite_core::engine::{Notice, QuizEngine};
use recite_core::grading::Grader;
use recite_core::judge::AiJudge;
use recite_core::model::{PoolSelection, StudyMode, UnitFilter};
use recite_core::parser::load_bank_or_empty;
use recite_core::session::QuizSession;
use recite_core::traits::LlmProvider;
use recite_providers::config::{load_config_from, ReciteConfig};
use recite_providers::create_provider;
use recite_sheets::SheetsStore;

use crate::render;
use crate::repl::{self, Input};

pub async fn execute(
    bank_path: Option<PathBuf>,
    review: bool,
    unit: Option<String>,
    include_mastered: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let sheets = config.require_sheets()?;
    let store = Arc::new(SheetsStore::new(
        &sheets.spreadsheet_id,
        &sheets.access_token,
        sheets.base_url.clone(),
    ));
    let grader = build_grader(&config)?;

    let bank_path = bank_path.unwrap_or_else(|| config.bank_path.clone());
    let (bank, bank_error) = load_bank_or_empty(&bank_path);
    if let Some(e) = bank_error {
        eprintln!("Error: {e}");
    }
    if bank.is_empty() {
        anyhow::bail!("no questions loaded from {}", bank_path.display());
    }
    for warning in &bank.warnings {
        tracing::warn!(line = ?warning.line, "{}", warning.message);
    }

    let units = match unit {
        Some(u) => u.parse::<UnitFilter>().map_err(anyhow::Error::msg)?,
        None => UnitFilter::all(),
    };
    let selection = PoolSelection {
        mode: if review {
            StudyMode::Review
        } else {
            StudyMode::Normal
        },
        units,
        include_mastered,
    };

    let engine = QuizEngine::new(bank, grader, store);
    let (mut session, notices) = engine.open(selection).await;

    let mut out = std::io::stdout();
    writeln!(
        out,
        "recite v{}: {} question(s) loaded. Type :help for commands.",
        env!("CARGO_PKG_VERSION"),
        engine.bank().len()
    )?;
    render::notices(&mut out, &notices)?;
    render::current_page(&mut out, &session, engine.bank())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            writeln!(out)?;
            break;
        };

        let input = repl::parse(&line);
        if input == Input::Quit {
            break;
        }
        handle(&engine, &mut session, input, &mut out).await?;
    }

    let elapsed = chrono::Utc::now() - session.started_at;
    writeln!(out, "\nSession summary")?;
    writeln!(out, "{}", render::summary(&session.tally, elapsed))?;
    tracing::info!(session = %session.id, answered = session.tally.answered, "session closed");
    Ok(())
}

fn build_grader(config: &ReciteConfig) -> Result<Grader> {
    let policy = config.grading.policy;
    if !config.grading.use_ai {
        return Ok(Grader::similarity_only(policy));
    }

    let provider_config = config.require_default_provider()?;
    let provider: Arc<dyn LlmProvider> =
        Arc::from(create_provider(&config.default_provider, provider_config)?);
    let judge = AiJudge::new(provider, config.default_model.clone())
        .with_temperature(config.temperature);
    Ok(Grader::new(policy, Some(judge)))
}

async fn handle(
    engine: &QuizEngine,
    session: &mut QuizSession,
    input: Input,
    out: &mut impl Write,
) -> Result<()> {
    let current = session.selection().clone();
    let notices = match input {
        Input::Submit(answer) => match engine.submit(session, &answer).await {
            Ok(outcome) => {
                render::transition(out, &outcome.transition)?;
                outcome.notices
            }
            Err(e) => vec![Notice::warning(e.to_string())],
        },
        Input::Graduate => match engine.graduate(session).await {
            Ok(outcome) => outcome.notices,
            Err(e) => vec![Notice::warning(e.to_string())],
        },
        Input::Review => {
            let selection = PoolSelection {
                mode: StudyMode::Review,
                ..current
            };
            engine.reselect(session, selection).await
        }
        Input::Normal => {
            let selection = PoolSelection {
                mode: StudyMode::Normal,
                ..current
            };
            engine.reselect(session, selection).await
        }
        Input::Unit(units) => {
            let mut notices = Vec::new();
            if current.mode == StudyMode::Review {
                notices.push(Notice::info(
                    "Unit filters apply in normal mode; switching with :normal.",
                ));
            }
            let selection = PoolSelection {
                mode: StudyMode::Normal,
                units,
                ..current
            };
            notices.extend(engine.reselect(session, selection).await);
            notices
        }
        Input::Mastered(include_mastered) => {
            let selection = PoolSelection {
                include_mastered,
                ..current
            };
            engine.reselect(session, selection).await
        }
        Input::Units => {
            writeln!(out, "{}", render::unit_table(engine.bank()))?;
            return Ok(());
        }
        Input::Help => {
            writeln!(out, "{}", repl::HELP)?;
            return Ok(());
        }
        Input::Invalid(message) => {
            render::notices(out, &[Notice::warning(message)])?;
            return Ok(());
        }
        Input::Quit => return Ok(()),
    };

    render::notices(out, &notices)?;
    render::current_page(out, session, engine.bank())?;
    Ok(())
}
