//! Harness emitter: Go source for one fuzz wrapper per target.
//!
//! A package's artifact looks like:
//!
//! ```text
//! package demo
//!
//! import (
//!     go_fuzz_utils "github.com/trailofbits/go-fuzz-utils"
//!     "testing"
//! )
//!
//! func GetTypeProvider(data []byte) (*go_fuzz_utils.TypeProvider, error) { ... }
//!
//! func Fuzz_Nosy_T_M__(f *testing.F) {
//!     f.Fuzz(func(t *testing.T, data []byte) {
//!         ...
//!     })
//! }
//! ```
//!
//! Targets and constructor candidates are sorted by their signature string, so
//! the output depends only on the set of declarations, not their order.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use nosy_types::{FunctionDescriptor, PackageDescriptor, PackageRef, TypeUniverse, Variable};
use tracing::{debug, info};

use crate::config::{DecodeSettings, HarnessConfig};

use super::constructor_map::{ConstructorMap, ConstructorMatch};
use super::errors::{SkipReason, TargetOutcome};
use super::filter::TargetFilter;
use super::fuzzability::{FuzzabilityAnalyzer, ParamSupport};
use super::imports::{ImportSet, GO_FUZZ_UTILS_ALIAS};
use super::naming::{NameResolver, ReservedNames};
use super::registry::FuzzTargetRecord;

const INDENT: &str = "\t\t";

/// Generated artifact for one package.
#[derive(Debug, Clone)]
pub struct PackageHarness {
    pub package: PackageRef,
    pub destination: PathBuf,
    pub file_name: String,
    /// File contents; `None` when no target produced a wrapper.
    pub source: Option<String>,
    /// One outcome per attempted target, in emission order.
    pub outcomes: Vec<TargetOutcome>,
    pub records: Vec<FuzzTargetRecord>,
    /// First skip, reported when every target was skipped.
    pub failure: Option<SkipReason>,
}

impl PackageHarness {
    pub fn path(&self) -> PathBuf {
        self.destination.join(&self.file_name)
    }

    pub fn emitted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_emitted()).count()
    }
}

/// State shared by the wrappers of one artifact.
struct FileContext<'p> {
    package: &'p PackageRef,
    destination: &'p Path,
    imports: ImportSet,
    body: Vec<String>,
    wrappers: BTreeSet<String>,
    records: Vec<FuzzTargetRecord>,
}

/// A wrapper parameter ready to print.
struct WrapperParam {
    ident: String,
    ty: String,
    nil_checked: bool,
}

pub struct HarnessEmitter<'a> {
    config: &'a HarnessConfig,
    analyzer: FuzzabilityAnalyzer<'a>,
    filter: TargetFilter<'a>,
    reserved: ReservedNames,
}

impl<'a> HarnessEmitter<'a> {
    pub fn new(config: &'a HarnessConfig, universe: &'a TypeUniverse) -> Self {
        Self {
            config,
            analyzer: FuzzabilityAnalyzer::with_supported_interfaces(
                universe,
                config.supported_interfaces.iter().cloned(),
            ),
            filter: TargetFilter::new(config, universe),
            reserved: ReservedNames::with_extra(config.reserved_names.iter().cloned()),
        }
    }

    pub fn filter(&self) -> &TargetFilter<'a> {
        &self.filter
    }

    /// Emit every includable target of `pkg` into one artifact.
    pub fn emit_package(
        &self,
        pkg: &PackageDescriptor,
        destination: &Path,
        file_name: &str,
    ) -> PackageHarness {
        let mut targets: Vec<&FunctionDescriptor> = pkg
            .functions
            .iter()
            .filter(|f| {
                let keep = self.filter.function_is_includable(f);
                if !keep {
                    debug!("ignoring {}", f.qualified_name());
                }
                keep
            })
            .collect();
        sort_by_signature(&mut targets);

        let mut constructors: Vec<&FunctionDescriptor> = pkg
            .constructors
            .iter()
            .filter(|c| {
                self.analyzer.classify_params(&c.params).tier != ParamSupport::NoSupport
                    && c.params.iter().all(|p| self.filter.parameter_is_includable(p))
            })
            .collect();
        sort_by_signature(&mut constructors);
        let ctors = ConstructorMap::from_constructors(constructors);

        let local = (!self.config.qualify_all).then_some(&pkg.package);
        let mut ctx = FileContext {
            package: &pkg.package,
            destination,
            imports: ImportSet::new(local),
            body: Vec::new(),
            wrappers: BTreeSet::new(),
            records: Vec::new(),
        };

        let outcomes: Vec<TargetOutcome> = targets
            .into_iter()
            .map(|f| self.emit_target(&mut ctx, f, &ctors))
            .collect();

        let emitted = outcomes.iter().any(TargetOutcome::is_emitted);
        let failure = if emitted {
            None
        } else {
            outcomes.iter().find_map(|o| o.skip_reason().cloned())
        };
        let source = emitted.then(|| self.assemble(&ctx));

        PackageHarness {
            package: pkg.package.clone(),
            destination: destination.to_path_buf(),
            file_name: file_name.to_string(),
            source,
            outcomes,
            records: ctx.records,
            failure,
        }
    }

    /// Emit one wrapper into the file, or explain why not.
    fn emit_target(
        &self,
        ctx: &mut FileContext<'_>,
        function: &FunctionDescriptor,
        ctors: &ConstructorMap<'_>,
    ) -> TargetOutcome {
        let qualified = function.qualified_name();
        let skip = |reason: SkipReason| {
            info!("skipping: {}", reason);
            TargetOutcome::Skipped { reason }
        };

        let wrapper = match &function.receiver {
            None => format!("Fuzz_Nosy_{}__", function.name),
            Some(recv) => match recv.ty.named_type().and_then(|n| n.type_name()) {
                Some(recv_name) => format!("Fuzz_Nosy_{}_{}__", recv_name, function.name),
                None => {
                    return skip(SkipReason::UnresolvedReceiver {
                        function: qualified,
                        type_string: recv.ty.to_string(),
                    })
                }
            },
        };
        if ctx.wrappers.contains(&wrapper) {
            return skip(SkipReason::DuplicateWrapperName {
                function: qualified,
                wrapper,
            });
        }

        // Receiver stand-ins come first, then the target's own params.
        let (ctor, mut all_params): (Option<ConstructorMatch<'_>>, Vec<&Variable>) =
            match &function.receiver {
                Some(recv) => ctors.match_receiver(recv),
                None => (None, Vec::new()),
            };
        let offset = all_params.len();
        all_params.extend(function.params.iter());

        if all_params.is_empty() {
            return skip(SkipReason::ZeroUsableParameters {
                function: qualified,
            });
        }

        let report = self.analyzer.classify_params(all_params.iter().copied());
        if report.tier == ParamSupport::NoSupport {
            let type_string = report.offending_type.unwrap_or_default();
            ctx.body.push(format!(
                "// skipping {} because parameters include func, chan, or unsupported interface: {}",
                wrapper, type_string
            ));
            ctx.body.push(String::new());
            return skip(SkipReason::UnsupportedParameterKind {
                function: qualified,
                type_string,
            });
        }

        // Render types before naming so parameters never shadow an import used here.
        let types: Vec<String> = all_params
            .iter()
            .map(|v| v.ty.render(&mut ctx.imports))
            .collect();
        let target_prefix = qualifier_prefix(&mut ctx.imports, &function.package);
        let ctor_prefix = ctor.map(|c| qualifier_prefix(&mut ctx.imports, &c.constructor.package));
        let reserved = self.reserved.extended(
            ctx.imports
                .take_touched()
                .into_iter()
                .chain(["testing".to_string(), GO_FUZZ_UTILS_ALIAS.to_string()]),
        );
        let resolver = NameResolver::new(&ctx.package.name, &reserved);
        let idents = resolver.resolve_all(&all_params);

        let params: Vec<WrapperParam> = all_params
            .iter()
            .zip(idents.iter())
            .zip(types)
            .map(|((v, ident), ty)| WrapperParam {
                ident: ident.clone(),
                ty,
                nil_checked: v.ty.is_pointer(),
            })
            .collect();

        let mut lines = Vec::new();
        lines.push(format!("func {}(f *testing.F) {{", wrapper));
        match report.tier {
            ParamSupport::NativeSupport => {
                let sig: Vec<String> = params
                    .iter()
                    .map(|p| format!("{} {}", p.ident, p.ty))
                    .collect();
                lines.push(format!(
                    "\tf.Fuzz(func(t *testing.T, {}) {{",
                    sig.join(", ")
                ));
                push_nil_guard(&mut lines, &params);
            }
            _ => {
                lines.push("\tf.Fuzz(func(t *testing.T, data []byte) {".to_string());
                lines.push(format!("{}tp, fill_err := GetTypeProvider(data)", INDENT));
                push_early_return(&mut lines, "fill_err != nil");
                for p in &params {
                    lines.push(format!("{}var {} {}", INDENT, p.ident, p.ty));
                    lines.push(format!("{}fill_err = tp.Fill(&{})", INDENT, p.ident));
                    push_early_return(&mut lines, "fill_err != nil");
                }
                push_nil_guard(&mut lines, &params);
            }
        }

        let receiver_ident = match (&function.receiver, ctor) {
            (Some(recv), Some(found)) => {
                let local = resolver.resolve_local(recv, 0, &all_params, &idents);
                let ctor_fn = found.constructor;
                let args = call_args(&idents[..offset], ctor_fn.variadic);
                let results = if found.second_result_is_err {
                    format!("{}, err", local)
                } else {
                    local.clone()
                };
                lines.push(format!(
                    "{}{} := {}{}({})",
                    INDENT,
                    results,
                    ctor_prefix.unwrap_or_default(),
                    ctor_fn.name,
                    args
                ));
                if found.second_result_is_err {
                    push_early_return(&mut lines, "err != nil");
                }
                Some(local)
            }
            (Some(_), None) => Some(idents[0].clone()),
            (None, _) => None,
        };

        let args = call_args(&idents[offset..], function.variadic);
        let callee = match receiver_ident {
            Some(recv) => format!("{}.{}", recv, function.name),
            None => format!("{}{}", target_prefix, function.name),
        };
        lines.push(format!("{}{}({})", INDENT, callee, args));
        lines.push("\t})".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        ctx.body.extend(lines);
        ctx.wrappers.insert(wrapper.clone());
        ctx.records
            .push(FuzzTargetRecord::new(wrapper.clone(), ctx.destination));
        debug!("emitted {} for {}", wrapper, qualified);

        TargetOutcome::Emitted {
            function: qualified,
            wrapper,
            support: report.tier,
        }
    }

    fn assemble(&self, ctx: &FileContext<'_>) -> String {
        let mut lines: Vec<String> = Vec::new();
        if self.config.generated_header {
            lines.push("// Code generated by nosy-neighbor. DO NOT EDIT.".to_string());
            lines.push(String::new());
        }
        if self.config.qualify_all {
            lines.push(format!("package {}_test", ctx.package.name));
        } else {
            lines.push(format!("package {}", ctx.package.name));
        }
        lines.push(String::new());
        lines.extend(ctx.imports.import_block());
        lines.push(String::new());
        lines.extend(type_provider_helper(&self.config.decode));
        lines.push(String::new());
        lines.extend(ctx.body.iter().cloned());

        let mut source = lines.join("\n");
        // Exactly one trailing newline.
        while source.ends_with("\n\n") {
            source.pop();
        }
        if !source.ends_with('\n') {
            source.push('\n');
        }
        source
    }
}

fn sort_by_signature(functions: &mut [&FunctionDescriptor]) {
    functions.sort_by_cached_key(|f| f.signature_string());
}

/// `pkg.` for a package that must be qualified, empty for the local package.
fn qualifier_prefix(imports: &mut ImportSet, package: &PackageRef) -> String {
    use nosy_types::Qualifier;
    let ident = imports.qualify(package);
    if ident.is_empty() {
        ident
    } else {
        format!("{}.", ident)
    }
}

fn call_args(idents: &[String], variadic: bool) -> String {
    let mut args = idents.join(", ");
    if variadic && !idents.is_empty() {
        args.push_str("...");
    }
    args
}

fn push_early_return(lines: &mut Vec<String>, condition: &str) {
    lines.push(format!("{}if {} {{", INDENT, condition));
    lines.push(format!("{}\treturn", INDENT));
    lines.push(format!("{}}}", INDENT));
}

/// One disjunctive guard over every pointer-typed parameter.
fn push_nil_guard(lines: &mut Vec<String>, params: &[WrapperParam]) {
    let checks: Vec<String> = params
        .iter()
        .filter(|p| p.nil_checked)
        .map(|p| format!("{} == nil", p.ident))
        .collect();
    if !checks.is_empty() {
        push_early_return(lines, &checks.join(" || "));
    }
}

fn push_helper_err_check(lines: &mut Vec<String>) {
    lines.push("\tif err != nil {".to_string());
    lines.push("\t\treturn nil, err".to_string());
    lines.push("\t}".to_string());
}

fn type_provider_helper(decode: &DecodeSettings) -> Vec<String> {
    let [s_min, s_max] = decode.string_bounds;
    let [l_min, l_max] = decode.slice_bounds;
    let [b0, b1, b2, b3] = decode.biases;

    let mut lines = vec![
        format!(
            "func GetTypeProvider(data []byte) (*{}.TypeProvider, error) {{",
            GO_FUZZ_UTILS_ALIAS
        ),
        format!("\ttp, err := {}.NewTypeProvider(data)", GO_FUZZ_UTILS_ALIAS),
    ];
    push_helper_err_check(&mut lines);
    lines.push(format!("\terr = tp.SetParamsStringBounds({}, {})", s_min, s_max));
    push_helper_err_check(&mut lines);
    lines.push(format!("\terr = tp.SetParamsSliceBounds({}, {})", l_min, l_max));
    push_helper_err_check(&mut lines);
    lines.push(format!(
        "\terr = tp.SetParamsBiases({}, {}, {}, {})",
        b0, b1, b2, b3
    ));
    push_helper_err_check(&mut lines);
    lines.push("\treturn tp, nil".to_string());
    lines.push("}".to_string());
    lines
}
