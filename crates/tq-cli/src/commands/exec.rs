use tq_engine::ActionResult;

use super::{WorldOptions, open};

/// Run each command in order and print every envelope as one JSON line.
///
/// A failed command does not stop the rest; the exit status reports
/// whether the last command succeeded.
pub async fn run(options: &WorldOptions, commands: &[String]) -> Result<(), String> {
    let (mut session, player) = open(options).await?;

    let mut last: Option<ActionResult> = None;
    for line in commands {
        let outcome = session.route(line, &player).await;
        for result in outcome.envelopes() {
            let json = serde_json::to_string(result).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        last = Some(outcome.result);
    }

    match last {
        Some(ActionResult::Failure { message }) => Err(message),
        _ => Ok(()),
    }
}
