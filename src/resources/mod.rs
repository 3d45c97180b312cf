//! Asset loading for native and web builds.
//!
//! Natively assets are read from `./assets` next to the working directory, then
//! from the copy the build script places in `OUT_DIR`. On the web they are
//! fetched from `<origin>/assets/`.

use anyhow::Context;

use crate::data_structures::texture::Texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no global window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("cannot read the page origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{origin}/assets/"))?;
    Ok(base.join(file_name)?)
}

/// Paths tried in order when loading an asset natively.
#[cfg(not(target_arch = "wasm32"))]
pub fn asset_candidates(file_name: &str) -> Vec<std::path::PathBuf> {
    vec![
        std::path::Path::new("./assets").join(file_name),
        std::path::Path::new(env!("OUT_DIR")).join("assets").join(file_name),
    ]
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        let response = reqwest::get(url.clone()).await?.error_for_status()?;
        log::info!("fetched {url}");
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let mut last_error = None;
        let mut found = None;
        for path in asset_candidates(file_name) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    log::info!("loaded {}", path.display());
                    found = Some(bytes);
                    break;
                }
                Err(e) => last_error = Some((path, e)),
            }
        }
        match (found, last_error) {
            (Some(bytes), _) => bytes,
            (None, Some((path, e))) => {
                return Err(e).with_context(|| format!("cannot read asset `{file_name}` (last tried {})", path.display()));
            }
            (None, None) => anyhow::bail!("no location to load `{file_name}` from"),
        }
    };

    Ok(data)
}

pub async fn load_texture(file_name: &str, device: &wgpu::Device, queue: &wgpu::Queue) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name)
}
