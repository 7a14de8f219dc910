//! Browser asset loading
//!
//! The optional machine config is fetched first. Every symbol image starts downloading at once; results are awaited in
//! catalog order, decoded through an offscreen 2D canvas and packed into the
//! texture atlas.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Response};

use super::AssetProgress;
use crate::config::{MachineConfig, SymbolAsset};
use crate::error::GameError;
use crate::renderer::TextureAtlas;
use crate::sim::TextureHandle;

/// Atlas cell edge in texels
pub const ATLAS_CELL_SIZE: u32 = 128;
/// Optional machine configuration served next to the page
pub const CONFIG_PATH: &str = "machine.json";

/// Body of the optional machine config; `None` when the host serves none
pub async fn fetch_config_json(path: &str) -> Option<String> {
    let window = web_sys::window()?;
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .ok()?
        .dyn_into()
        .ok()?;
    if !response.ok() {
        log::debug!("No machine config at {} ({})", path, response.status());
        return None;
    }
    let body = JsFuture::from(response.text().ok()?).await.ok()?;
    body.as_string()
}

struct PendingImage<'a> {
    asset: &'a SymbolAsset,
    image: HtmlImageElement,
    loaded: JsFuture,
}

fn asset_error(asset: &SymbolAsset, reason: impl Into<String>) -> GameError {
    GameError::AssetLoad {
        name: asset.name.clone(),
        path: asset.path.clone(),
        reason: reason.into(),
    }
}

fn start_load(asset: &SymbolAsset) -> Result<PendingImage<'_>, GameError> {
    let image = HtmlImageElement::new().map_err(|e| asset_error(asset, format!("{:?}", e)))?;
    let target = image.clone();
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        target.set_onload(Some(&resolve));
        target.set_onerror(Some(&reject));
    });
    image.set_src(&asset.path);
    Ok(PendingImage {
        asset,
        image,
        loaded: JsFuture::from(promise),
    })
}

/// Draw the image at cell resolution and read back its RGBA pixels
fn rasterize(
    context: &CanvasRenderingContext2d,
    asset: &SymbolAsset,
    image: &HtmlImageElement,
    size: u32,
) -> Result<Vec<u8>, GameError> {
    let side = size as f64;
    context.clear_rect(0.0, 0.0, side, side);
    context
        .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, side, side)
        .map_err(|e| asset_error(asset, format!("draw failed: {:?}", e)))?;
    let data = context
        .get_image_data(0.0, 0.0, side, side)
        .map_err(|e| asset_error(asset, format!("readback failed: {:?}", e)))?;
    Ok(data.data().0)
}

fn scratch_context(size: u32) -> Result<CanvasRenderingContext2d, GameError> {
    let renderer_err = |what: &str| GameError::Renderer(format!("scratch canvas: {}", what));
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| renderer_err("no document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| renderer_err("create failed"))?
        .dyn_into()
        .map_err(|_| renderer_err("not a canvas"))?;
    canvas.set_width(size);
    canvas.set_height(size);
    canvas
        .get_context("2d")
        .map_err(|_| renderer_err("no 2d context"))?
        .ok_or_else(|| renderer_err("no 2d context"))?
        .dyn_into()
        .map_err(|_| renderer_err("unexpected context type"))
}

/// Load every configured symbol image into a fresh atlas.
///
/// `on_progress` receives the loaded fraction after each image. The first
/// failure aborts the whole load.
pub async fn load_symbol_textures(
    config: &MachineConfig,
    mut on_progress: impl FnMut(f32),
) -> Result<(TextureAtlas, HashMap<String, TextureHandle>), GameError> {
    let mut atlas = TextureAtlas::new(ATLAS_CELL_SIZE, config.symbols.len() as u32);
    let mut textures = HashMap::with_capacity(config.symbols.len());
    let mut progress = AssetProgress::new(config.symbols.len());
    let context = scratch_context(ATLAS_CELL_SIZE)?;

    let pending = config
        .symbols
        .iter()
        .map(start_load)
        .collect::<Result<Vec<_>, _>>()?;

    for PendingImage {
        asset,
        image,
        loaded,
    } in pending
    {
        loaded
            .await
            .map_err(|_| asset_error(asset, "image failed to load"))?;
        let pixels = rasterize(&context, asset, &image, ATLAS_CELL_SIZE)?;
        let handle = atlas.insert(&pixels, ATLAS_CELL_SIZE, ATLAS_CELL_SIZE)?;
        log::debug!("Loaded symbol '{}' from {}", asset.name, asset.path);
        textures.insert(asset.name.clone(), handle);
        on_progress(progress.advance());
    }

    Ok((atlas, textures))
}
