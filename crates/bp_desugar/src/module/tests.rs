use super::*;
use crate::test_util::{assert_lowers_to, parse};
use bp_ast::{ModuleFormat, ModuleName};
use pretty_assertions::assert_eq;

fn format_options(format: ModuleFormat) -> CompileOptions {
    CompileOptions {
        module_format: format,
        ..CompileOptions::default()
    }
}

fn wrap(src: &str, options: &CompileOptions, unit_name: Option<&str>) -> Module {
    let mut pass = ModuleTransformer::new(options, unit_name).unwrap();
    pass.run(parse(src)).unwrap()
}

#[test]
fn amd_dependencies_follow_import_order() {
    let mut pass = ModuleTransformer::new(&format_options(ModuleFormat::Amd), Some("main")).unwrap();
    let out = pass
        .run(parse(
            r#"import a from "./a.js"; import {b} from "./b"; export var c = a + b;"#,
        ))
        .unwrap();
    let specifiers: Vec<_> = pass.dependencies().iter().map(|d| d.specifier.as_str()).collect();
    assert_eq!(specifiers, ["./a", "./b"]);
    assert_lowers_to(
        out,
        r#"
        define(["./a", "./b"], function ($__a, $__b) {
            "use strict";
            var __moduleName = null;
            if (!$__a || !$__a.__esModule) $__a = {default: $__a};
            if (!$__b || !$__b.__esModule) $__b = {default: $__b};
            var a = $__a.default;
            var b = $__b.b;
            var c = a + b;
            return { get c() { return c; }, __esModule: true };
        });
        "#,
    );
}

#[test]
fn specifiers_naming_the_same_module_share_a_dependency() {
    let mut pass = ModuleTransformer::new(&format_options(ModuleFormat::Amd), None).unwrap();
    pass.run(parse(r#"import {x} from "./a.js"; import {y} from "./a"; x(y);"#))
        .unwrap();
    assert_eq!(pass.dependencies().len(), 1);
    assert_eq!(&*pass.dependencies()[0].local.sym, "$__a");
}

#[test]
fn named_amd_module() {
    let options = CompileOptions {
        module_name: ModuleName::FromPath,
        ..format_options(ModuleFormat::Amd)
    };
    assert_lowers_to(
        wrap("go();", &options, Some("lib/x")),
        r#"define("lib/x", [], function () { "use strict"; var __moduleName = "lib/x"; go(); });"#,
    );
}

#[test]
fn top_level_this_binds_the_factory_to_the_global_object() {
    assert_lowers_to(
        wrap("this.x = 1; function f() { return this; }", &format_options(ModuleFormat::Amd), None),
        r#"
        define([], (function () {
            "use strict";
            var __moduleName = null;
            this.x = 1;
            function f() { return this; }
        }).bind(typeof global !== "undefined" ? global : this));
        "#,
    );
}

#[test]
fn commonjs_is_flat_and_merges_star_exports() {
    assert_lowers_to(
        wrap(
            r#""use strict"; import {x as y} from "./dep.js"; export default y * 2; export * from "./other";"#,
            &format_options(ModuleFormat::Commonjs),
            Some("main"),
        ),
        r#"
        "use strict";
        var __moduleName = null;
        var $__dep = require("./dep.js");
        var $__other = require("./other");
        if (!$__dep || !$__dep.__esModule) $__dep = {default: $__dep};
        if (!$__other || !$__other.__esModule) $__other = {default: $__other};
        var y = $__dep.x;
        var $__default = y * 2;
        var $__exports = { get default() { return $__default; }, __esModule: true };
        Object.keys($__other).forEach(function (key) {
            if (key !== "default" && !Object.prototype.hasOwnProperty.call($__exports, key))
                Object.defineProperty($__exports, key, {enumerable: true, get: function () { return $__other[key]; }});
        });
        module.exports = $__exports;
        "#,
    );
}

#[test]
fn commonjs_names_only_explicit_modules() {
    let options = CompileOptions {
        module_name: ModuleName::Explicit("pkg".into()),
        ..format_options(ModuleFormat::Commonjs)
    };
    assert_lowers_to(
        wrap("go();", &options, Some("main")),
        r#""use strict"; var __moduleName = "pkg"; go();"#,
    );
    let from_path = CompileOptions {
        module_name: ModuleName::FromPath,
        bundle: true,
        ..format_options(ModuleFormat::Commonjs)
    };
    assert_lowers_to(
        wrap("go();", &from_path, Some("main")),
        r#""use strict"; var __moduleName = null; go();"#,
    );
}

#[test]
fn system_reads_dependencies_from_the_registry() {
    let options = CompileOptions {
        bundle: true,
        module_name: ModuleName::FromPath,
        ..format_options(ModuleFormat::System)
    };
    assert_lowers_to(
        wrap(
            r#"import * as a from "./a.js"; export function f() { return a; }"#,
            &options,
            Some("m"),
        ),
        r#"
        System.registerModule("m", ["./a.js"], function () {
            "use strict";
            var __moduleName = "m";
            var $__a = System.get("./a.js");
            var a = $__a;
            function f() { return a; }
            return { get f() { return f; } };
        });
        "#,
    );
    assert_lowers_to(
        wrap("go();", &format_options(ModuleFormat::System), Some("m")),
        r#"System.register([], function () { "use strict"; var __moduleName = null; go(); });"#,
    );
}

#[test]
fn global_modules_publish_a_path_derived_binding() {
    assert_lowers_to(
        wrap(
            r#"import {x} from "./dep.js"; export class K {}"#,
            &format_options(ModuleFormat::Global),
            Some("lib/util"),
        ),
        r#"
        var $__lib_util = (function () {
            "use strict";
            var __moduleName = "lib/util";
            var x = $__dep.x;
            class K {}
            return { get K() { return K; } };
        })();
        "#,
    );
    assert_lowers_to(
        wrap("go();", &format_options(ModuleFormat::Global), None),
        r#"(function () { "use strict"; var __moduleName = null; go(); })();"#,
    );
}

#[test]
fn units_without_exports_have_no_epilog() {
    assert_lowers_to(
        wrap(r#"import "./side.js"; go();"#, &format_options(ModuleFormat::Amd), None),
        r#"
        define(["./side"], function ($__side) {
            "use strict";
            var __moduleName = null;
            if (!$__side || !$__side.__esModule) $__side = {default: $__side};
            go();
        });
        "#,
    );
}

#[test]
fn every_export_form_reaches_the_export_object() {
    assert_lowers_to(
        wrap(
            r#"
            var a, c;
            export {a as b, c};
            export * as ns from "./n.js";
            export {default as d, "x-y" as e} from "./m.js";
            export let [p, {q}] = pair;
            export default function () {}
            "#,
            &format_options(ModuleFormat::Amd),
            None,
        ),
        r#"
        define(["./n", "./m"], function ($__n, $__m) {
            "use strict";
            var __moduleName = null;
            if (!$__n || !$__n.__esModule) $__n = {default: $__n};
            if (!$__m || !$__m.__esModule) $__m = {default: $__m};
            var a, c;
            let [p, {q}] = pair;
            function $__default() {}
            return {
                get b() { return a; },
                get c() { return c; },
                get ns() { return $__n; },
                get d() { return $__m.default; },
                get e() { return $__m["x-y"]; },
                get p() { return p; },
                get q() { return q; },
                get default() { return $__default; },
                __esModule: true
            };
        });
        "#,
    );
}

#[test]
fn dependency_bindings_avoid_user_names() {
    let mut pass = ModuleTransformer::new(&format_options(ModuleFormat::Amd), None).unwrap();
    pass.run(parse(r#"import {x} from "./a.js"; var $__a = x;"#)).unwrap();
    assert_eq!(&*pass.dependencies()[0].local.sym, "$__a_1");
}

#[test]
fn global_dependencies_must_not_be_shadowed() {
    let mut pass = ModuleTransformer::new(&format_options(ModuleFormat::Global), Some("main")).unwrap();
    let err = pass
        .run(parse(r#"import {x} from "./dep.js"; var $__dep = 1; go(x);"#))
        .unwrap_err();
    assert!(matches!(err, TransformError::UnexpectedNode { pass: "modules", .. }), "{err}");
}

#[test]
fn global_dependency_names_are_kept_from_temporaries() {
    assert_lowers_to(
        wrap(
            r#"import * as e from "./exports.js"; export * from "./exports.js";"#,
            &format_options(ModuleFormat::Global),
            None,
        ),
        r#"
        (function () {
            "use strict";
            var __moduleName = null;
            var e = $__exports;
            var $__exports_1 = {};
            Object.keys($__exports).forEach(function (key) {
                if (key !== "default" && !Object.prototype.hasOwnProperty.call($__exports_1, key))
                    Object.defineProperty($__exports_1, key, {enumerable: true, get: function () { return $__exports[key]; }});
            });
            return $__exports_1;
        })();
        "#,
    );
}

#[test]
fn no_format_means_no_transformer() {
    assert!(ModuleTransformer::new(&CompileOptions::default(), Some("main")).is_none());
}
