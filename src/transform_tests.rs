#[cfg(test)]
mod tests {
    use crate::config::{Architecture, Platform, Runtime, TargetConfig, TransformOptions};
    use crate::transform::{transform, TransformKind, TransformResult};
    use pretty_assertions::assert_eq;

    fn run(source: &str, config: &TargetConfig) -> TransformResult {
        transform(source, config, &TransformOptions::default()).expect("transform should succeed")
    }

    fn darwin() -> TargetConfig {
        TargetConfig::new().with_platform(Platform::Darwin)
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SHORT-CIRCUIT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_no_import_returns_source_verbatim() {
        let source = "import { env } from 'other-lib';\n\nconst  mac =   env.darwin; // spacing kept\n";
        let result = run(source, &darwin());
        assert_eq!(result.code, source);
        assert_eq!(result.transform_count, 0);
        assert!(result.transformations.is_empty());
    }

    #[test]
    fn test_import_without_foldable_use_is_verbatim() {
        let source = "import { env } from 'envfold';\nconst  rt =  env.node;\n";
        let result = run(source, &darwin());
        assert_eq!(result.code, source);
        assert_eq!(result.transform_count, 0);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PROPERTY ACCESS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_property_resolves_for_pinned_platform() {
        let source = "import { env } from 'envfold';\nexport const mac = env.darwin;\n";

        let on_mac = run(source, &darwin());
        assert!(on_mac.code.contains("mac = true"), "got: {}", on_mac.code);
        assert_eq!(on_mac.transform_count, 1);
        assert_eq!(on_mac.transformations[0].kind, TransformKind::Property);
        assert_eq!(on_mac.transformations[0].original, "env.darwin");
        assert_eq!(on_mac.transformations[0].replacement, "true");

        let on_linux = run(source, &TargetConfig::new().with_platform(Platform::Linux));
        assert!(on_linux.code.contains("mac = false"), "got: {}", on_linux.code);
        assert_eq!(on_linux.transform_count, 1);
    }

    #[test]
    fn test_absent_platform_leaves_check_dynamic() {
        let source = "import { env } from 'envfold';\nexport const mac = env.darwin;\n";
        let result = run(source, &TargetConfig::new());
        assert!(result.code.contains("env.darwin"));
        assert_eq!(result.transform_count, 0);
    }

    #[test]
    fn test_alias_is_transparent() {
        let plain = run(
            "import { env } from 'envfold';\nexport const w = env.windows;\n",
            &darwin(),
        );
        let aliased = run(
            "import { env as detect } from 'envfold';\nexport const w = detect.windows;\n",
            &darwin(),
        );
        assert!(aliased.code.contains("w = false"), "got: {}", aliased.code);
        assert_eq!(plain.transform_count, aliased.transform_count);
        assert_eq!(plain.transformations[0].replacement, aliased.transformations[0].replacement);
    }

    #[test]
    fn test_split_namespaces() {
        let source = r#"import { platform, runtime as rt, arch } from "envfold";
export const a = platform.linux;
export const b = rt.deno;
export const c = arch.x64;
"#;
        let config = TargetConfig::new()
            .with_platform(Platform::Linux)
            .with_runtime(Runtime::Deno)
            .with_architecture(Architecture::Arm64);
        let result = run(source, &config);
        assert!(result.code.contains("a = true"));
        assert!(result.code.contains("b = true"));
        assert!(result.code.contains("c = false"));
        assert_eq!(result.transform_count, 3);
    }

    #[test]
    fn test_namespace_import() {
        let source = "import * as ef from 'npm:envfold@1.4.0';\nif (ef.env.linux) {\n  start();\n}\n";
        let result = run(source, &darwin());
        assert!(result.code.contains("if (false)"), "got: {}", result.code);
        assert!(!result.code.contains("ef.env.linux"));
    }

    #[test]
    fn test_custom_module_specifiers() {
        let source = "import { env } from '#detect';\nexport const mac = env.darwin;\n";
        let options = TransformOptions::default().with_module_specifiers(["#detect"]);

        let custom = transform(source, &darwin(), &options).unwrap();
        assert_eq!(custom.transform_count, 1);

        let defaults = run(source, &darwin());
        assert_eq!(defaults.transform_count, 0);
    }

    #[test]
    fn test_nested_positions_are_folded() {
        let source = r#"import { env } from "envfold";
function pick() {
  return env.windows ? "win" : (() => env.darwin)();
}
"#;
        let result = run(source, &darwin());
        assert_eq!(result.transform_count, 2);
        assert!(!result.code.contains("env.windows"));
        assert!(!result.code.contains("env.darwin"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COMBINATORS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_combinator_folds_fully() {
        let source =
            "import { env, all } from 'envfold';\nexport const ok = all(env.darwin, env.arm64);\n";

        let arm = run(source, &darwin().with_architecture(Architecture::Arm64));
        assert!(arm.code.contains("ok = true"), "got: {}", arm.code);
        assert_eq!(arm.transform_count, 1);
        assert_eq!(arm.transformations[0].kind, TransformKind::Combinator);
        assert_eq!(arm.transformations[0].original, "all(env.darwin, env.arm64)");

        let intel = run(source, &darwin().with_architecture(Architecture::X64));
        assert!(intel.code.contains("ok = false"), "got: {}", intel.code);
    }

    #[test]
    fn test_partial_fold_keeps_call() {
        let source =
            "import { env, all } from 'envfold';\nexport const ok = all(env.darwin, env.node);\n";
        let result = run(source, &darwin());

        assert!(result.code.contains("all(true, env.node)"), "got: {}", result.code);
        assert_eq!(result.transform_count, 1);
        assert_eq!(result.transformations[0].kind, TransformKind::Property);
        assert_eq!(result.transformations[0].original, "env.darwin");
    }

    #[test]
    fn test_method_combinators_on_aggregate() {
        let source = "import { env } from 'envfold';\nexport const x = env.any(env.linux, env.not(env.x64));\n";
        let config = darwin().with_architecture(Architecture::X64);
        let result = run(source, &config);
        assert!(result.code.contains("x = false"), "got: {}", result.code);
        assert_eq!(result.transform_count, 1);
    }

    #[test]
    fn test_logically_decided_but_unknown_is_not_folded() {
        // any(true, <unknown>) is true at runtime, but stays a call.
        let source = "import { env, any } from 'envfold';\nexport const x = any(env.darwin, env.bun);\n";
        let result = run(source, &darwin());
        assert!(result.code.contains("any(true, env.bun)"), "got: {}", result.code);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // FEATURES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_feature_unknown_without_feature_list() {
        let source = "import { feature } from 'envfold';\nexport const beta = feature(\"beta\");\n";
        let result = run(source, &darwin());
        assert_eq!(result.code, source);
        assert_eq!(result.transform_count, 0);
    }

    #[test]
    fn test_feature_folds_with_feature_list() {
        let source = "import { feature as flag } from 'envfold';\nexport const a = flag('beta');\nexport const b = flag('gamma');\n";
        let config = TargetConfig::new().with_features(["beta"]);
        let result = run(source, &config);
        assert!(result.code.contains("a = true"));
        assert!(result.code.contains("b = false"));
        assert!(result
            .transformations
            .iter()
            .all(|t| t.kind == TransformKind::Feature));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // POSITIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_record_positions_match_original_lines() {
        let source = "import { env, all } from 'envfold';\n\nexport const a = env.darwin;\nexport const b =\n  all(env.darwin, env.arm64);\n";
        let config = darwin().with_architecture(Architecture::Arm64);
        let result = run(source, &config);

        assert_eq!(result.transform_count, 2);
        assert_eq!(result.transformations.len(), result.transform_count);
        assert_eq!(
            (result.transformations[0].line, result.transformations[0].column),
            (3, 17)
        );
        assert_eq!(
            (result.transformations[1].line, result.transformations[1].column),
            (5, 2)
        );
    }

    #[test]
    fn test_records_serialize_camel_case() {
        let source = "import { env } from 'envfold';\nexport const a = env.darwin;\n";
        let result = run(source, &darwin());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["transformCount"], 1);
        assert_eq!(json["transformations"][0]["kind"], "property");
        assert_eq!(json["transformations"][0]["line"], 2);
        assert!(json["sourceMap"].is_null());
    }
}
