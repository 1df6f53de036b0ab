//! Avatar selection.
//!
//! Custom passes delegate to the remote generation flow; otherwise a
//! (name, tagline) pair and a sample image are picked from the fixed pool.
//! The RNG is injected so sample selection can be seeded in tests.

use rand::Rng;

use passforge_comfyui::avatar::{generate_custom_avatar, AvatarError};
use passforge_comfyui::AvatarResult;
use passforge_core::{paths, roster, Config};

/// Errors from avatar selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// Custom avatars require a personal interest for the prompt.
    #[error("A personal interest is required for custom avatars")]
    MissingInterest,

    #[error(transparent)]
    Generate(#[from] AvatarError),
}

/// Choose the avatar for one pass.
///
/// With `use_custom`, submits a generation job for
/// `(avatar_type, personal_interest)` and waits for its result; otherwise
/// picks uniformly from the 21-entry roster and the three sample images
/// of the avatar type. Whether the chosen sample file actually exists is
/// only checked when the composer reads it.
pub async fn select_avatar<R: Rng>(
    config: &Config,
    use_custom: bool,
    avatar_type: &str,
    personal_interest: Option<&str>,
    rng: &mut R,
) -> Result<AvatarResult, SelectError> {
    if use_custom {
        let interest = personal_interest.ok_or(SelectError::MissingInterest)?;
        return Ok(generate_custom_avatar(config, avatar_type, interest).await?);
    }

    let entry = roster::pick_entry(rng);
    let index = roster::pick_sample_index(rng);
    let file_path = paths::sample_path(&config.samples_dir, avatar_type, index);

    tracing::debug!(
        avatar_type,
        name = entry.name,
        sample = index,
        "Picked sample avatar",
    );

    Ok(AvatarResult {
        display_name: entry.name.to_string(),
        tagline: entry.tagline.to_string(),
        file_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            server_address: "127.0.0.1:8188".into(),
            client_id: "test".into(),
            completion_timeout: Duration::from_secs(1),
            templates_dir: PathBuf::from("Templates"),
            samples_dir: PathBuf::from("Samples"),
            avatars_dir: PathBuf::from("Avatars"),
            output_dir: PathBuf::from("FinalPass"),
            font_path: None,
            font_bold_path: None,
        }
    }

    #[tokio::test]
    async fn sample_selection_stays_in_the_fixed_pool() {
        let config = test_config();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let avatar = select_avatar(&config, false, "Female", None, &mut rng)
                .await
                .unwrap();

            assert!(roster::ROSTER
                .iter()
                .any(|e| e.name == avatar.display_name && e.tagline == avatar.tagline));

            let file = avatar.file_path.file_name().unwrap().to_str().unwrap();
            assert!(
                file == "Female_Sample1.png"
                    || file == "Female_Sample2.png"
                    || file == "Female_Sample3.png",
                "unexpected sample file {file}"
            );
        }
    }

    #[tokio::test]
    async fn seeded_selection_is_deterministic() {
        let config = test_config();
        let a = select_avatar(&config, false, "Male", None, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        let b = select_avatar(&config, false, "Male", None, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(a.display_name, b.display_name);
        assert_eq!(a.file_path, b.file_path);
    }

    #[tokio::test]
    async fn custom_without_interest_is_rejected() {
        let config = test_config();
        let err = select_avatar(&config, true, "Panda", None, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SelectError::MissingInterest));
    }
}
