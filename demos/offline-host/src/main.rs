use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use playlink::prelude::*;

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// A terminal "app": flows are queued instead of shown, notices are
/// printed, and resource names come from a fixed table.
struct ConsoleHost {
    resources: HashMap<&'static str, &'static str>,
    queued: Mutex<Vec<(UiFlow, RequestCode)>>,
}

impl ConsoleHost {
    fn new() -> Self {
        Self {
            resources: HashMap::from([
                ("first_win", "CgkI_first_win"),
                ("games_played", "CgkI_games_played"),
                ("high_scores", "CgkI_high_scores"),
            ]),
            queued: Mutex::new(Vec::new()),
        }
    }

    fn next_flow(&self) -> Option<(UiFlow, RequestCode)> {
        let mut queued = self.queued.lock().ok()?;
        if queued.is_empty() {
            return None;
        }
        Some(queued.remove(0))
    }
}

impl HostApp for ConsoleHost {
    fn launch_flow(&self, flow: UiFlow, request_code: RequestCode) {
        println!("[ui] opening {} ({request_code})", flow.action);
        if let Ok(mut queued) = self.queued.lock() {
            queued.push((flow, request_code));
        }
    }

    fn show_notice(&self, message: &str) {
        println!("[notice] {message}");
    }

    fn resolve_resource(&self, name: &str) -> Option<String> {
        self.resources.get(name).map(|key| key.to_string())
    }
}

type Services = GameServices<OfflineProvider, ConsoleHost>;

/// Plays the player's part for every queued flow: accept sign-in, close
/// everything else.
async fn answer_flows(services: &Services) {
    while let Some((flow, code)) = services.host().next_flow() {
        let payload = OfflinePayload::Accepted {
            display_name: "Demo Player".into(),
        };
        // -1 is the platform's RESULT_OK.
        let result = ResultCode::from_raw(-1);
        let routed = services.route_ui_result(code, payload, result).await;
        println!("[ui] {:?} finished: {routed:?}", flow.kind);
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    playlink::init_logging();

    let prefs: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("playlink-demo").join("prefs.json"));
    println!("preferences at {}", prefs.display());

    let services = GameServicesBuilder::new()
        .preference_file(&prefs)
        .build(OfflineProvider::new(), ConsoleHost::new())?;

    let outcome = services.init().await;
    println!("init: {outcome:?} (preference {})", services.login_preference()?);
    answer_flows(&services).await;

    if !services.is_signed_in() {
        println!("not signed in; run again after deleting {}", prefs.display());
        return Ok(());
    }

    services.unlock_achievement("first_win");
    services.increment_achievement("games_played", 1);
    services.submit_score(1337, "high_scores");

    services.show_leaderboard("high_scores").await;
    services.show_achievements().await;
    answer_flows(&services).await;

    services.sign_out();
    tracing::info!(status = %services.status(), "demo finished");
    Ok(())
}
