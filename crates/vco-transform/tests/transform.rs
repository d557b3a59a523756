use vco_exclude::{ExcludeRule, Excludes};
use vco_transform::{ComponentOverrideTransformer, TransformError, TransformOptions};

const RESOLVER: &str = "__VUE_COMPONENT_OVERRIDE_RESOLVE_test__";

fn transformer() -> ComponentOverrideTransformer {
    ComponentOverrideTransformer::new(TransformOptions {
        uid: Some("test".to_string()),
        ..Default::default()
    })
    .unwrap()
}

fn import_line() -> String {
    format!(
        "import {{ resolveVueComponent as {RESOLVER} }} from 'vite-plugin-vue-component-override';\n"
    )
}

#[test]
fn test_static_import_resolved_in_setup() {
    let code = concat!(
        "import Foo from './Foo.vue';\n",
        "export default {\n",
        "  setup() {\n",
        "    return { Foo };\n",
        "  }\n",
        "};\n",
    );
    let output = transformer().transform(code, "/src/Page.ts").unwrap().unwrap();

    let expected = format!(
        concat!(
            "{import}",
            "import Foo__Tmp0 from './Foo.vue';\n",
            "export default {{\n",
            "  setup() {{\n",
            "const Foo = {r}('Foo', Foo__Tmp0);\n",
            "\n",
            "    return {{ Foo }};\n",
            "  }}\n",
            "}};\n",
        ),
        import = import_line(),
        r = RESOLVER
    );
    assert_eq!(output.code, expected);
}

#[test]
fn test_dynamic_import_wrapped_in_place() {
    let code = "const Bar = defineAsyncComponent(() => import('./Bar.vue'));\n";
    let output = transformer().transform(code, "/src/lazy.js").unwrap().unwrap();
    assert_eq!(
        output.code,
        format!(
            "{}const Bar = {RESOLVER}('Bar', defineAsyncComponent(() => import('./Bar.vue')))\n",
            import_line()
        )
    );
}

#[test]
fn test_several_imports_get_distinct_names() {
    let code = "import A from './A.vue';\nimport B from \"./B.vue\"\n;";
    let output = transformer().transform(code, "/src/x.ts").unwrap().unwrap();
    assert!(output.code.contains("import A__Tmp0 from './A.vue';"));
    assert!(output.code.contains("import B__Tmp1 from './B.vue';"));
    assert!(output.code.contains(&format!("const B = {RESOLVER}('B', B__Tmp1);")));
}

#[test]
fn test_vue_setup_script_gets_import_after_script_tag() {
    let code = "<script setup lang=\"ts\">\nimport Child from './Child.vue';\n</script>\n";
    let id = "/src/App.vue?vue&type=script&setup=true&lang.ts";
    let output = transformer().transform(code, id).unwrap().unwrap();

    let script_start = "<script setup lang=\"ts\">\n";
    let after_tag = output.code.split_once(script_start).unwrap().1;
    assert!(after_tag.starts_with(&import_line()));
    assert!(output.code.contains("import Child__Tmp0 from './Child.vue';\n</script>"));
}

#[test]
fn test_skipped_modules() {
    let t = transformer();
    let code = "import Foo from './Foo.vue';";
    assert!(t.transform(code, "/src/App.vue").unwrap().is_none());
    assert!(t.transform(code, "/src/App.vue?vue&type=style").unwrap().is_none());
    assert!(t.transform(code, "/src/style.css").unwrap().is_none());
    assert!(t.transform(code, "/src/main.mjs").unwrap().is_none());
}

#[test]
fn test_configured_excludes() {
    let t = ComponentOverrideTransformer::new(TransformOptions {
        uid: Some("test".to_string()),
        exclude: vec!["**/node_modules/**".to_string()],
        exclude_regex: vec![r"\.stories\.ts$".to_string()],
        ..Default::default()
    })
    .unwrap();
    let code = "import Foo from './Foo.vue';";
    assert!(
        t.transform(code, r"C:\app\node_modules\ui\index.js")
            .unwrap()
            .is_none()
    );
    assert!(t.transform(code, "/src/Foo.stories.ts").unwrap().is_none());
    assert!(t.transform(code, "/src/Foo.ts").unwrap().is_some());
}

#[test]
fn test_predicate_excludes() {
    let excludes: Excludes = [ExcludeRule::predicate(|code, _| {
        Ok(code.contains("@no-override"))
    })]
    .into_iter()
    .collect();
    let t = ComponentOverrideTransformer::with_excludes(TransformOptions::default(), excludes)
        .unwrap();
    let code = "// @no-override\nimport Foo from './Foo.vue';";
    assert!(t.transform(code, "/src/a.ts").unwrap().is_none());
}

#[test]
fn test_commented_imports_are_left_alone() {
    let code = "// import A from './A.vue';\n/* import B from './B.vue'; */\nconst x = 1;\n";
    let output = transformer().transform(code, "/src/a.ts").unwrap().unwrap();
    assert_eq!(output.code, code);
}

#[test]
fn test_renamed_imports_are_not_rewritten_twice() {
    let code = format!(
        "import {{ resolveVueComponent as {RESOLVER} }} from 'x';\nimport Foo__Tmp3 from './Foo.vue';\nimport Bar from './Bar.vue';\n"
    );
    let output = transformer().transform(&code, "/src/a.ts").unwrap().unwrap();
    assert_eq!(output.code.matches("resolveVueComponent as").count(), 1);
    assert!(output.code.contains("import Foo__Tmp3 from './Foo.vue';"));
    assert!(output.code.contains("import Bar__Tmp0 from './Bar.vue';"));
}

#[test]
fn test_offsets_survive_multibyte_text() {
    let code = "const é = 'ü'; // ñ\nimport Foo from './Foo.vue';\n";
    let output = transformer().transform(code, "/src/a.ts").unwrap().unwrap();
    assert!(
        output
            .code
            .contains("const é = 'ü'; // ñ\nimport Foo__Tmp0 from './Foo.vue';\n")
    );
}

#[test]
fn test_map_points_at_module() {
    let code = "import Foo from './Foo.vue';\nFoo;\n";
    let output = transformer().transform(code, "/src/a.ts").unwrap().unwrap();
    assert_eq!(output.map.sources, vec!["/src/a.ts".to_string()]);
    assert_eq!(output.map.sources_content, Some(vec![code.to_string()]));

    let decoded = output.map.decode().unwrap();
    assert_eq!(decoded.mappings.len(), output.code.split('\n').count());
}

#[test]
fn test_random_uid_is_short() {
    let t = ComponentOverrideTransformer::new(TransformOptions::default()).unwrap();
    let uid = t
        .resolver_name()
        .strip_prefix("__VUE_COMPONENT_OVERRIDE_RESOLVE_")
        .and_then(|rest| rest.strip_suffix("__"))
        .unwrap();
    assert_eq!(uid.len(), 6);
    assert!(uid.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_invalid_exclude_is_reported() {
    let err = ComponentOverrideTransformer::new(TransformOptions {
        exclude_regex: vec!["(".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, TransformError::Exclude(_)));
}

#[test]
fn test_static_imports_can_be_disabled() {
    let t = ComponentOverrideTransformer::new(TransformOptions {
        uid: Some("test".to_string()),
        handle_static_imports: false,
        ..Default::default()
    })
    .unwrap();
    let code = "import Foo from './Foo.vue';\n";
    let output = t.transform(code, "/src/a.ts").unwrap().unwrap();
    assert_eq!(output.code, code);
}
