//! Shader Template Manager
//!
//! Renders the WGSL compute kernels from minijinja templates and caches the
//! compiled `ShaderModule`s by the xxh3-128 hash of their final source.
//!
//! Templates use a custom delimiter set so they do not collide with WGSL
//! syntax:
//!
//! | Construct  | Syntax            |
//! |------------|-------------------|
//! | Block      | `{$ if x $}`      |
//! | Variable   | `{{ name }}`      |
//! | Line block | `$$ if x`         |
//!
//! `{$ include "name" $}` resolves against `chunks/`.

use minijinja::value::Value;
use minijinja::{Environment, Error, ErrorKind, syntax::SyntaxConfig};
use rust_embed::RustEmbed;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::OnceLock;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::{DaoError, Result};

static SHADER_ENV: OnceLock<std::result::Result<Environment<'static>, DaoError>> =
    OnceLock::new();

#[derive(RustEmbed)]
#[folder = "src/renderer/pipeline/shaders"]
struct ShaderAssets;

fn build_env() -> Result<Environment<'static>> {
    let mut env = Environment::new();

    let syntax = SyntaxConfig::builder()
        .block_delimiters("{$", "$}")
        .variable_delimiters("{{", "}}")
        .line_statement_prefix("$$")
        .build()?;

    env.set_syntax(syntax);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
    env.set_loader(shader_loader);
    env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

    Ok(env)
}

/// Shared template environment.
pub fn get_env() -> Result<&'static Environment<'static>> {
    SHADER_ENV.get_or_init(build_env).as_ref().map_err(Clone::clone)
}

fn shader_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wgsl"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.wgsl"))
    };

    // Debug builds read from disk so kernels can be edited without a rebuild.
    #[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
    {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/renderer/pipeline/shaders")
            .join(filename.as_ref());
        if path.exists() {
            return match std::fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) => Err(Error::new(
                    ErrorKind::TemplateNotFound,
                    format!("Failed to read file: {e}"),
                )),
            };
        }
    }

    if let Some(file) = ShaderAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

/// Renders `template_name` with the given `(name, value)` defines.
///
/// A missing template maps to [`DaoError::ShaderNotFound`].
pub fn render_shader_source(template_name: &str, defines: &[(&str, &str)]) -> Result<String> {
    let env = get_env()?;
    let template = env.get_template(template_name)?;

    let ctx: Value = defines.iter().map(|&(k, v)| (k, v)).collect();
    let source = template.render(ctx)?;

    Ok(format!("// === Auto-generated Compute Shader: {template_name} ===\n{source}"))
}

// ─── ShaderManager ────────────────────────────────────────────────────────────

/// Compiled shader module cache.
///
/// Deduplicates `wgpu::ShaderModule`s by hashing the **final** WGSL source
/// with xxh3-128, so two templates rendering to the same text share a module.
#[derive(Default)]
pub struct ShaderManager {
    module_cache: FxHashMap<u128, wgpu::ShaderModule>,
}

impl ShaderManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders and compiles a template (or returns the cached module).
    ///
    /// Returns `(module, source_hash)`.
    pub fn get_or_compile_template(
        &mut self,
        device: &wgpu::Device,
        template_name: &str,
        defines: &[(&str, &str)],
    ) -> Result<(&wgpu::ShaderModule, u128)> {
        let source = render_shader_source(template_name, defines)?;
        let hash = xxh3_128(source.as_bytes());

        let module = self.module_cache.entry(hash).or_insert_with(|| {
            log::debug!("Compiling shader module {template_name} ({hash:032x})");
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("Shader Module {template_name}")),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });

        Ok((module, hash))
    }

    /// Returns the number of cached shader modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module_cache.len()
    }
}
