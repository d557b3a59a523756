//! The component override rewrite

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use vco_edit::{EditBuffer, EditError, MapOptions, MappingResolution, SourceMap};
use vco_exclude::Excludes;
use vco_source_map::byte_to_char;

use crate::error::TransformError;
use crate::mask::mask_comments;
use crate::module_id::ModuleId;
use crate::options::TransformOptions;

static STATIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(.*?)\s+from\s+['"]((.*?)\.vue)['"]\s*(;?)"#).unwrap()
});

static DYNAMIC_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(const|let|var)\s+(.+)\s*=\s*defineAsyncComponent\(\(\)\s*=>\s*import\(\s*['"](.+?\.vue)['"]\s*\)\s*\);?"#,
    )
    .unwrap()
});

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<script(.*?)?>").unwrap());

static SETUP_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"setup\s*\((.*?)\)\s*\{?").unwrap());

/// Marker left in renamed static imports; imports carrying it are skipped
const TMP_MARKER: &str = "__Tmp";

/// Rewritten module text and its source map
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    pub map: SourceMap,
}

/// Rewrites `.vue` component imports so every component goes through a
/// runtime resolver that can substitute an override.
///
/// A static import
///
/// ```text
/// import Foo from './Foo.vue';
/// ```
///
/// becomes an import under a temporary name plus a resolver call placed at
/// the top of `setup()`:
///
/// ```text
/// import Foo__Tmp0 from './Foo.vue';
/// const Foo = RESOLVE('Foo', Foo__Tmp0);
/// ```
///
/// and `defineAsyncComponent(() => import(...))` declarations are wrapped
/// in the resolver in place.
#[derive(Debug)]
pub struct ComponentOverrideTransformer {
    options: TransformOptions,
    excludes: Excludes,
    extensions: Regex,
    resolver_name: String,
    existing_import: Regex,
}

impl ComponentOverrideTransformer {
    pub fn new(options: TransformOptions) -> Result<Self, TransformError> {
        let excludes = Excludes::from_patterns(&options.exclude, &options.exclude_regex)?;
        Self::with_excludes(options, excludes)
    }

    /// Like [`ComponentOverrideTransformer::new`], with exclusion rules built
    /// by the caller (for example predicates) in place of the configured
    /// patterns.
    pub fn with_excludes(
        options: TransformOptions,
        excludes: Excludes,
    ) -> Result<Self, TransformError> {
        let alternatives: Vec<String> = options
            .extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect();
        let extensions = Regex::new(&format!(r"\.(?:{})$", alternatives.join("|")))
            .map_err(TransformError::Pattern)?;

        let uid = match &options.uid {
            Some(uid) => uid.clone(),
            None => {
                let mut uid = uuid::Uuid::new_v4().simple().to_string();
                uid.truncate(6);
                uid
            }
        };
        let resolver_name = format!("__VUE_COMPONENT_OVERRIDE_RESOLVE_{uid}__");
        let existing_import = Regex::new(&format!(
            r"\{{.*?{}.*?\}}\s+from",
            regex::escape(&resolver_name)
        ))
        .map_err(TransformError::Pattern)?;

        Ok(ComponentOverrideTransformer {
            options,
            excludes,
            extensions,
            resolver_name,
            existing_import,
        })
    }

    /// Identifier the generated code binds the runtime resolver to
    pub fn resolver_name(&self) -> &str {
        &self.resolver_name
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// True if `id` would be skipped by the exclusion rules
    pub fn is_excluded(&self, code: &str, id: &str) -> bool {
        self.excludes.is_excluded(code, id)
    }

    /// Rewrite one module. Returns `Ok(None)` when the module is not one
    /// this transformer handles.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>, TransformError> {
        let module = ModuleId::parse(id);
        if module.is_vue() && !module.is_setup_script() {
            return Ok(None);
        }
        if !self.extensions.is_match(module.path) {
            return Ok(None);
        }
        if self.excludes.is_excluded(code, id) {
            tracing::debug!(id, "module excluded");
            return Ok(None);
        }

        let edit_error = |source| TransformError::Edit {
            id: id.to_string(),
            source,
        };
        let masked = mask_comments(code);
        let mut buffer = EditBuffer::new(code);
        let mut resolve_lines = Vec::new();
        let mut rewritten = 0usize;

        self.rewrite(&mut buffer, &masked, &mut resolve_lines, &mut rewritten)
            .map_err(edit_error)?;

        if rewritten > 0 {
            self.add_resolver_import(&mut buffer, &masked, &module)
                .map_err(edit_error)?;
        }
        if !resolve_lines.is_empty() {
            add_resolve_lines(&mut buffer, &masked, &resolve_lines).map_err(edit_error)?;
        }

        tracing::debug!(id, rewritten, "transformed module");

        let map = buffer.generate_map(&MapOptions {
            source: Some(id.to_string()),
            include_content: true,
            hires: MappingResolution::Hires,
            ..Default::default()
        });
        Ok(Some(TransformOutput {
            code: buffer.to_string(),
            map,
        }))
    }

    fn rewrite(
        &self,
        buffer: &mut EditBuffer,
        masked: &str,
        resolve_lines: &mut Vec<String>,
        rewritten: &mut usize,
    ) -> Result<(), EditError> {
        if self.options.handle_static_imports {
            for caps in STATIC_IMPORT.captures_iter(masked) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let component = &caps[1];
                let uri = &caps[2];
                if component.contains(TMP_MARKER) {
                    continue;
                }

                let tmp_name = format!("{component}{TMP_MARKER}{}", resolve_lines.len());
                resolve_lines.push(format!(
                    "const {component} = {}('{component}', {tmp_name});",
                    self.resolver_name
                ));

                let (start, end) = char_span(masked, whole);
                buffer.overwrite(
                    start,
                    end,
                    &format!("import {tmp_name} from '{uri}';"),
                    Default::default(),
                )?;
                *rewritten += 1;
            }
        }

        if self.options.handle_dynamic_imports {
            for caps in DYNAMIC_IMPORT.captures_iter(masked) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let sign = &caps[1];
                let component = caps[2].trim();
                let uri = &caps[3];

                let replaced = format!(
                    "{sign} {component} = {}('{component}', defineAsyncComponent(() => import('{uri}')))",
                    self.resolver_name
                );
                let (start, end) = char_span(masked, whole);
                buffer.overwrite(start, end, &replaced, Default::default())?;
                *rewritten += 1;
            }
        }

        Ok(())
    }

    fn add_resolver_import(
        &self,
        buffer: &mut EditBuffer,
        masked: &str,
        module: &ModuleId<'_>,
    ) -> Result<(), EditError> {
        if self.existing_import.is_match(masked) {
            return Ok(());
        }

        let import_line = format!(
            "import {{ resolveVueComponent as {} }} from '{}';\n",
            self.resolver_name, self.options.runtime_module
        );

        // Inside a single-file component the import belongs in the script block
        if module.is_vue() {
            if let Some(tag) = SCRIPT_TAG.find(masked) {
                let at = byte_to_char(masked, tag.end());
                buffer.append_left(at as isize, &format!("\n{import_line}"))?;
                return Ok(());
            }
        }

        buffer.prepend(&import_line);
        Ok(())
    }
}

/// Resolver calls go at the top of `setup(...)`, or the top of the module
fn add_resolve_lines(
    buffer: &mut EditBuffer,
    masked: &str,
    lines: &[String],
) -> Result<(), EditError> {
    let block = format!("\n{}\n", lines.join("\n"));
    match SETUP_CALL.find(masked) {
        Some(setup) => {
            let at = byte_to_char(masked, setup.end());
            buffer.append_left(at as isize, &block)?;
        }
        None => {
            buffer.prepend(&block);
        }
    }
    Ok(())
}

/// Character range of a match in `text`
fn char_span(text: &str, found: Match<'_>) -> (isize, isize) {
    let start = byte_to_char(text, found.start());
    let end = start + found.as_str().chars().count();
    (start as isize, end as isize)
}
