//! Demonstrates handing a downstream image server a two-use token for one thumbnail, backed by
//! the file store so outstanding grants survive a restart.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use fetch_grant::{
	auth::{Credential, Identity, PrincipalId, ResourceTarget},
	engine::{TokenEngine, Verdict},
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let path = env::temp_dir().join(format!("fetch_grant_demo_{}.json", std::process::id()));
	let store: Arc<dyn TokenStore> = Arc::new(FileStore::open(&path)?);
	let engine = TokenEngine::new(store);
	let identity =
		Identity::new(PrincipalId::new("user-42")?, "Ada", Credential::new("session-hash"));
	let target = ResourceTarget::parse("obj:1", "thumb")?;
	let token = engine.issue_token_with_uses(target, identity, 2).await?;

	// The image server presents the token on each of its two fetches.
	for attempt in 1..=3 {
		let verdict =
			engine.validator().validate_token("obj:1", "thumb", token.expose()).await?;

		match verdict {
			Verdict::Granted(identity) =>
				println!("Fetch {attempt}: granted for {}.", identity.display_name),
			Verdict::Denied => println!("Fetch {attempt}: denied."),
		}
	}

	println!("Reaped {} expired tokens.", engine.reap_expired_tokens().await);

	std::fs::remove_file(&path)?;

	Ok(())
}
