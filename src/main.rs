use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use switchboard::config::KernelConfig;
use switchboard::kernel::event::{
    SessionEvent, SessionId, TelephonyCommand, TranscriptSegment, TurnOutput,
};
use switchboard::services::llm::ConversationClient;
use switchboard::services::tools::{ToolClient, APOLOGY};
use switchboard::SessionSupervisor;

const LLM_URL: &str = "http://localhost:8080";
const TOOLS_URL: &str = "http://localhost:8081";

/// Console harness: one call session fed from stdin, one line per finalized
/// transcript segment. Slash commands stand in for transport signals:
/// /menu /human /interrupt /return /bye
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => KernelConfig::from_json(&std::fs::read_to_string(&path)?)?,
        None => KernelConfig::default(),
    };
    let budget = Duration::from_millis(config.turn_budget_ms);

    let llm = ConversationClient::new(LLM_URL, budget);
    let tools = ToolClient::new(TOOLS_URL, budget);

    let (out_tx, mut out_rx) = mpsc::channel(100);
    let mut supervisor = SessionSupervisor::new(config, out_tx);

    let session = SessionId::new();
    supervisor.open(session);
    info!(%session, "call session ready; type to speak");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            maybe = out_rx.recv() => {
                let Some((sid, output)) = maybe else { break };
                match output {
                    TurnOutput::Speak(text) => {
                        println!("[speak:{}] {}", sid, text);
                    }
                    TurnOutput::Telephony(command) => match command {
                        TelephonyCommand::PressDigits(digits) => {
                            println!("[dtmf:{}] {}", sid, digits);
                        }
                        TelephonyCommand::SpeakPhrase(phrase) => {
                            println!("[speak:{}] {}", sid, phrase);
                        }
                        TelephonyCommand::Wait => println!("[wait:{}]", sid),
                        TelephonyCommand::EndCall => println!("[end:{}]", sid),
                    },
                    TurnOutput::Action(request) => {
                        match tools.execute(&request).await {
                            Ok(receipt) if receipt.ok => {
                                info!(key = %request.idempotency_key, "action accepted");
                            }
                            Ok(receipt) => {
                                warn!(detail = %receipt.detail, "action rejected");
                                println!("[speak:{}] {}", sid, APOLOGY);
                            }
                            Err(e) => {
                                // One keyed retry; the same idempotency key
                                // means a duplicate cannot land.
                                warn!(error = %e, "tool layer unreachable, retrying");
                                match tools.retry(&request).await {
                                    Ok(receipt) if receipt.ok => {
                                        info!(key = %request.idempotency_key, "action accepted on retry");
                                    }
                                    _ => println!("[speak:{}] {}", sid, APOLOGY),
                                }
                            }
                        }
                    }
                    TurnOutput::Converse(context) => {
                        match llm.generate_turn(&context).await {
                            Ok(reply) => println!("[speak:{}] {}", sid, reply),
                            Err(e) => warn!(error = %e, "llm turn abandoned"),
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let event = match line.trim() {
                    "" => continue,
                    "/menu" => SessionEvent::MenuDetected,
                    "/human" => SessionEvent::HumanReached,
                    "/interrupt" => SessionEvent::Interrupted,
                    "/return" => SessionEvent::UserReturned,
                    "/bye" => SessionEvent::Hangup,
                    text => SessionEvent::Segment(TranscriptSegment::final_text(text)),
                };
                let hangup = event == SessionEvent::Hangup;
                if let Err(e) = supervisor.route(session, event).await {
                    warn!(error = %e, "route failed");
                    break;
                }
                if hangup {
                    break;
                }
            }
        }
    }

    supervisor.shutdown();
    Ok(())
}
