//! Mediation network token expansion.
//!
//! `mediation.properties` groups adapter metadata by network prefix:
//!
//! ```text
//! applovin.dependencies=com.google.ads.mediation:applovin:13.3.1.0
//! applovin.pod=GoogleMobileAdsMediationAppLovin
//! applovin.podVersion=13.3.1.0
//! ```
//!
//! Every network found becomes a [`MediationNetworkEntry`], and its seven
//! fields replace the `@<network><Field>@` markers of the generated
//! `MediationNetwork.gd` script, one network at a time in name order.

mod error;
mod network;

pub use error::{MediationError, MediationResult};
pub use network::{MediationNetworkEntry, NetworkField};

use std::path::Path;

use gdadmob_props::PropertySet;
use gdadmob_template::substitute;
use tracing::{debug, info, warn};

/// What [`expand_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Expanded { networks: usize, replacements: usize },
    /// Target file absent; nothing was written.
    Skipped,
}

/// Substitutes every network's tokens into `text`, networks in the order
/// given (sorted when produced by [`MediationNetworkEntry::collect`]).
pub fn expand_text(text: &str, networks: &[MediationNetworkEntry]) -> (String, usize) {
    let mut current = text.to_string();
    let mut total = 0;
    for network in networks {
        let (next, replacements) = substitute(&current, &network.tokens());
        for r in &replacements {
            debug!(network = %network.name, token = %r.token, "Replacing mediation token");
        }
        total += replacements.len();
        current = next;
    }
    (current, total)
}

/// Expands mediation tokens in place in an already generated file.
///
/// A missing target is not an error: the build stays usable when mediation
/// is not configured, so this logs a warning and reports
/// [`ExpandOutcome::Skipped`].
pub fn expand_file(target: &Path, props: &PropertySet) -> MediationResult<ExpandOutcome> {
    if !target.is_file() {
        warn!(path = %target.display(), "Mediation target not found, skipping replacement");
        return Ok(ExpandOutcome::Skipped);
    }

    let networks = MediationNetworkEntry::collect(props);
    let content = std::fs::read_to_string(target).map_err(|e| MediationError::io(target, e))?;
    let (expanded, replacements) = expand_text(&content, &networks);
    std::fs::write(target, expanded).map_err(|e| MediationError::io(target, e))?;

    info!(
        path = %target.display(),
        networks = networks.len(),
        replacements,
        "Mediation tokens replaced"
    );
    Ok(ExpandOutcome::Expanded {
        networks: networks.len(),
        replacements,
    })
}
