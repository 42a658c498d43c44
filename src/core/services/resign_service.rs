use std::path::{Path, PathBuf};

use der::Decode;

use crate::core::errors::{Result, ResignError};
use crate::core::models::fingerprint::Fingerprint;
use crate::core::models::inventory::{PackageInventory, ReferenceMatch};
use crate::core::models::key_request::KeyRequest;
use crate::core::models::key_role::KeyRole;
use crate::core::traits::aligner::PackageAligner;
use crate::core::traits::signer::PackageSigner;

/// The package whose signature defines a role's current key.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceHit<'a> {
    pub package: &'a Path,
    pub fingerprint: &'a Fingerprint,
    /// How many inventory entries matched the reference name.
    /// Only the first one is used.
    pub candidates: usize,
}

/// Everything decided about one role before any file is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResignPlan {
    pub role: KeyRole,
    pub reference_package: PathBuf,
    pub reference_candidates: usize,
    pub old: Fingerprint,
    pub new: Fingerprint,
    /// Packages currently signed with `old`, in inventory order.
    pub group: Vec<PathBuf>,
}

/// Outcome of a completed role.
#[derive(Debug, Clone, PartialEq)]
pub struct ResignReport {
    pub role: KeyRole,
    pub resigned: Vec<PathBuf>,
}

/// Find the fingerprint a role currently has in the image.
///
/// The first entry matching `reference` under `rule` wins.
pub fn compute_old_fingerprint<'a>(
    inventory: &'a PackageInventory,
    role: KeyRole,
    reference: &str,
    rule: ReferenceMatch,
) -> Result<ReferenceHit<'a>> {
    let hits = inventory.find_matching(reference, rule);
    let (package, fingerprint) = hits.first().copied().ok_or_else(|| {
        ResignError::ReferenceNotFound {
            role: role.to_string(),
            reference: reference.to_string(),
        }
    })?;

    Ok(ReferenceHit {
        package,
        fingerprint,
        candidates: hits.len(),
    })
}

/// Fingerprint of the X.509 certificate stored at `certificate`.
///
/// Accepts PEM (`-----BEGIN CERTIFICATE-----`) or raw DER. The digest is
/// taken over the DER encoding, as keytool does.
pub fn compute_new_fingerprint(certificate: &Path) -> Result<Fingerprint> {
    let load_err = |reason: String| ResignError::CertificateLoad {
        path: certificate.to_path_buf(),
        reason,
    };

    let raw = std::fs::read(certificate).map_err(|e| load_err(e.to_string()))?;
    let der = if raw.trim_ascii_start().starts_with(b"-----BEGIN") {
        let blocks = pem::parse_many(&raw).map_err(|e| load_err(e.to_string()))?;
        blocks
            .into_iter()
            .find(|p| p.tag() == "CERTIFICATE")
            .map(|p| p.into_contents())
            .ok_or_else(|| load_err("no CERTIFICATE block in PEM file".into()))?
    } else {
        raw
    };

    x509_cert::Certificate::from_der(&der)
        .map_err(|e| load_err(format!("not an X.509 certificate ({e})")))?;

    Ok(Fingerprint::of_der(&der))
}

/// Every package currently signed with `fingerprint`, in inventory order.
pub fn select_group(inventory: &PackageInventory, fingerprint: &Fingerprint) -> Vec<PathBuf> {
    inventory
        .iter()
        .filter(|(_, fp)| *fp == fingerprint)
        .map(|(path, _)| path.to_path_buf())
        .collect()
}

/// Where the signer writes its output before alignment: next to the
/// package, with `.tmp` appended to the file name.
pub fn temp_artifact_path(package: &Path) -> PathBuf {
    let mut name = package.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    package.with_file_name(name)
}

/// Re-signs every package sharing a role's current key.
pub struct ResignService<S: PackageSigner, A: PackageAligner> {
    pub signer: S,
    pub aligner: A,
    pub rule: ReferenceMatch,
}

impl<S: PackageSigner, A: PackageAligner> ResignService<S, A> {
    /// Decide what re-signing `request` means for this image.
    ///
    /// Fails with `ReferenceNotFound`, `CertificateLoad` or `IdentityKey`.
    pub fn plan(
        &self,
        inventory: &PackageInventory,
        request: &KeyRequest,
        reference: &str,
    ) -> Result<ResignPlan> {
        let hit = compute_old_fingerprint(inventory, request.role, reference, self.rule)?;
        let new = compute_new_fingerprint(&request.certificate_path())?;
        self.plan_with(inventory, request, hit, new)
    }

    fn plan_with(
        &self,
        inventory: &PackageInventory,
        request: &KeyRequest,
        hit: ReferenceHit<'_>,
        new: Fingerprint,
    ) -> Result<ResignPlan> {
        if new == *hit.fingerprint {
            return Err(ResignError::IdentityKey {
                role: request.role.to_string(),
                key: request.display_name(),
                fingerprint: new.to_string(),
            });
        }

        Ok(ResignPlan {
            role: request.role,
            reference_package: hit.package.to_path_buf(),
            reference_candidates: hit.candidates,
            group: select_group(inventory, hit.fingerprint),
            old: hit.fingerprint.clone(),
            new,
        })
    }

    /// Sign and align every package of the plan, stopping at the first failure.
    ///
    /// Packages already processed stay re-signed. `on_package` is called
    /// before each package.
    pub fn execute(
        &self,
        plan: &ResignPlan,
        request: &KeyRequest,
        mut on_package: impl FnMut(usize, &Path),
    ) -> Result<ResignReport> {
        let certificate = request.certificate_path();
        let private_key = request.private_key_path();
        let mut resigned = Vec::with_capacity(plan.group.len());

        for (i, package) in plan.group.iter().enumerate() {
            on_package(i, package);
            self.resign_package(package, &certificate, &private_key)?;
            resigned.push(package.clone());
        }

        Ok(ResignReport {
            role: plan.role,
            resigned,
        })
    }

    /// Plan and execute in one step.
    ///
    /// The command plans every role before executing any, so it calls
    /// `plan` and `execute` separately.
    #[cfg(test)]
    pub fn resign_role(
        &self,
        inventory: &PackageInventory,
        request: &KeyRequest,
        reference: &str,
        on_package: impl FnMut(usize, &Path),
    ) -> Result<ResignReport> {
        let plan = self.plan(inventory, request, reference)?;
        self.execute(&plan, request, on_package)
    }

    fn resign_package(
        &self,
        package: &Path,
        certificate: &Path,
        private_key: &Path,
    ) -> Result<()> {
        let artifact = temp_artifact_path(package);

        self.signer
            .sign(package, certificate, private_key, &artifact)
            .map_err(|e| with_leftover(e, &artifact))?;
        self.aligner
            .align(&artifact, package)
            .map_err(|e| with_leftover(e, &artifact))?;

        std::fs::remove_file(&artifact)?;
        Ok(())
    }
}

/// Attach the temporary artifact to a tool error if it is still on disk.
fn with_leftover(err: ResignError, artifact: &Path) -> ResignError {
    match err {
        ResignError::ExternalTool {
            tool,
            package,
            reason,
            leftover: None,
        } if artifact.exists() => ResignError::ExternalTool {
            tool,
            package,
            reason,
            leftover: Some(artifact.to_path_buf()),
        },
        other => other,
    }
}
