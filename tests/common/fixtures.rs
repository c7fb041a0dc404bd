//! Test fixtures - reusable bundle content constants for tests.

/// Entry point template with one `<%= ver %>` substitution point.
///
/// The rendered page passes the version to the worker as a query string,
/// the same value the worker's own stamped references carry.
pub const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Viewer</title>
  <link rel="stylesheet" href="site.css">
</head>
<body>
  <canvas id="view"></canvas>
  <script>
    var page_ver = <%= ver %>;
    var worker = new Worker("worker.js?" + page_ver);
  </script>
</body>
</html>
"#;

/// Template without any substitution point (check should reject it)
pub const INDEX_NO_PLACEHOLDER: &str = "<!DOCTYPE html>\n<html><body>static</body></html>\n";

/// Worker script referencing both engine assets with quoted names
pub const WORKER_JS: &str = r#"importScripts("engine.js");

onmessage = async function (e) {
  const response = await fetch("engine.wasm");
  const module = await WebAssembly.compile(await response.arrayBuffer());
  postMessage(await run(module, e.data));
};
"#;

/// Engine glue script with no asset references of its own
pub const ENGINE_JS: &str = r#"function run(module, input) {
  return WebAssembly.instantiate(module).then(function (instance) {
    return instance.exports.process(input);
  });
}
"#;

/// Minimal wasm module bytes (magic number and version only)
pub const ENGINE_WASM: &[u8] = b"\x00asm\x01\x00\x00\x00";

/// Screen stylesheet (primary)
pub const SITE_CSS: &str = "body { margin: 0; background: #111; }\ncanvas { display: block; width: 100vw; height: 100vh; }\n";

/// Print stylesheet (secondary)
pub const PRINT_CSS: &str = "@media print {\n  canvas { display: none; }\n}\n";

/// Full manifest wiring up the standard bundle.
///
/// Exercises both copy forms: bare-string shorthand and the table form
/// with a `dest` remapping `pkg/engine.wasm` next to the worker.
pub const MANIFEST_FULL: &str = r#"copy = [
    "worker.js",
    "engine.js",
    { src = "pkg/engine.wasm", dest = "engine.wasm" },
]

[template]
file = "index.html"

[output]
dir = "out"

[styles]
primary = "css/site.css"
secondary = "css/print.css"
out = "site.css"

[[stamp]]
file = "worker.js"
assets = ["engine.wasm", "engine.js"]
declare = "app_ver"
"#;

/// Manifest rendering the template and nothing else
pub const MANIFEST_TEMPLATE_ONLY: &str = "[template]\nfile = \"index.html\"\n";
