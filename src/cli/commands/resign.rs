use std::path::{Path, PathBuf};

use crate::adapters::android::toolchain::Toolchain;
use crate::cli::{Cli, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::inventory::PackageInventory;
use crate::core::models::key_request::KeyRequest;
use crate::core::services::inventory_service::{InventoryService, find_packages};
use crate::core::services::resign_service::{ResignPlan, ResignService};

/// Execute a `romsign` run.
///
/// Arguments and configuration are validated first, then the external
/// tools, then the image is scanned. Every requested role is planned
/// before the first package is signed, so a wrong key aborts the run
/// with the image untouched.
pub fn execute(args: &Cli) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?;
    let requests = args.key_requests()?;
    let packages = find_packages(&args.dir)?;

    let toolchain = Toolchain::preflight(&config.tools)?;
    output::detail(&format!(
        "Java {} ({})",
        toolchain.java.version,
        toolchain.java.program.display()
    ));
    output::detail(&format!("SignApk: {}", toolchain.signapk_jar.display()));

    output::header(&format!(
        "Resigning in: {}",
        args.dir.join("**").join("*.apk").display()
    ));
    if packages.is_empty() {
        output::warning("No APK found in the ROM directory");
    }

    let inventory = scan(&toolchain, &packages)?;

    let service = ResignService {
        signer: toolchain.signer(args.verbose),
        aligner: toolchain.aligner(config.align.boundary, args.verbose),
        rule: config.matching.reference,
    };

    let mut plans = Vec::with_capacity(requests.len());
    for request in &requests {
        let plan = service.plan(&inventory, request, config.reference_for(request.role))?;
        plans.push(plan);
    }

    for (plan, request) in plans.iter().zip(&requests) {
        show_plan(plan, request, config.reference_for(request.role));
    }

    if args.dry_run {
        output::success("Dry run: no package was modified");
        return Ok(());
    }

    let mut total = 0;
    for (plan, request) in plans.iter().zip(&requests) {
        let pb = output::progress(plan.group.len(), &format!("Signing with {} key", plan.role));
        let result = service.execute(plan, request, |i, package| {
            pb.set_position(i as u64);
            pb.set_message(file_name(package));
        });
        pb.finish_and_clear();
        let report = result?;

        total += report.resigned.len();
        output::success(&format!(
            "Re-signed {} package(s) with the new {} key",
            report.resigned.len(),
            report.role
        ));
    }

    output::success(&format!(
        "Done: {total} package(s) re-signed for {} key(s)",
        plans.len()
    ));

    Ok(())
}

/// Read the current signature of every package.
fn scan(toolchain: &Toolchain, packages: &[PathBuf]) -> Result<PackageInventory> {
    let svc = InventoryService {
        inspector: toolchain.inspector(),
    };

    let pb = output::progress(packages.len(), "Checking old signatures...");
    let result = svc.build(packages, |i, package| {
        pb.set_position(i as u64);
        pb.set_message(file_name(package));
    });
    pb.finish_and_clear();
    let inventory = result?;

    output::success(&format!(
        "Checked {} package(s) signed with {} distinct key(s)",
        inventory.len(),
        inventory.distinct_fingerprints()
    ));
    for (path, fingerprint) in inventory.iter() {
        output::detail(&format!("{fingerprint}  {}", path.display()));
    }

    Ok(inventory)
}

fn show_plan(plan: &ResignPlan, request: &KeyRequest, reference: &str) {
    output::header(&format!(
        "{} key → {}",
        capitalize(plan.role.name()),
        request.display_name()
    ));
    output::info(&format!("Old {} key: {}", plan.role, plan.old));
    output::info(&format!("New {} key: {}", plan.role, plan.new));
    output::detail(&format!(
        "Reference package: {}",
        plan.reference_package.display()
    ));

    if plan.reference_candidates > 1 {
        output::warning(&format!(
            "{} packages match '{reference}', using {}",
            plan.reference_candidates,
            plan.reference_package.display()
        ));
    }

    if plan.group.is_empty() {
        output::warning("No package is signed with the old key; nothing to re-sign");
        return;
    }

    output::info(&format!("{} package(s) to re-sign:", plan.group.len()));
    for package in &plan.group {
        output::detail(&package.display().to_string());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_role_names() {
        assert_eq!(capitalize("platform"), "Platform");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn file_name_falls_back_to_full_path() {
        assert_eq!(file_name(Path::new("system/app/Foo.apk")), "Foo.apk");
        assert_eq!(file_name(Path::new("/")), "/");
    }
}
