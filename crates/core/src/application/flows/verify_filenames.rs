// Filename verification flow
// Lists a folder, prints valid names, fails with every invalid name

use async_trait::async_trait;
use std::path::Path;

use super::{Flow, FlowContext, FlowDescriptor, FlowParams};
use crate::application::tasks::{check_filenames, list_filenames};
use crate::domain::ValidationError;
use crate::error::Result;

pub const ENTRYPOINT: &str = "flows/content_filenames_verification_flow:verify_filenames_flow";
pub const DEFAULT_FOLDER: &str = "content_files";

const DESCRIPTOR: FlowDescriptor = FlowDescriptor {
    name: "Verify correctness of filenames",
    log_prints: true,
};

pub struct VerifyFilenamesFlow;

#[async_trait]
impl Flow for VerifyFilenamesFlow {
    fn descriptor(&self) -> &FlowDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &FlowContext, params: &FlowParams) -> Result<()> {
        let folder = params.str_or("folder_path", DEFAULT_FOLDER)?;

        let filenames = list_filenames(ctx.fs(), Path::new(folder))?;
        let report = check_filenames(filenames);

        ctx.print(&DESCRIPTOR, format!("Valid filenames: {:?}", report.valid));
        if report.is_clean() {
            ctx.print(&DESCRIPTOR, "All filenames are valid.");
            return Ok(());
        }

        ctx.print(&DESCRIPTOR, format!("Invalid filenames: {:?}", report.invalid));
        Err(ValidationError::ValidationFailure {
            invalid: report.invalid,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::filesystem::mocks::MockFileSystem;
    use crate::port::shell_runner::mocks::MockShellRunner;
    use std::sync::Arc;

    fn ctx(fs: MockFileSystem) -> FlowContext {
        FlowContext::new(Arc::new(MockShellRunner::new()), Arc::new(fs))
    }

    #[tokio::test]
    async fn test_fails_listing_every_invalid_name() {
        let ctx = ctx(MockFileSystem::new().with_dir(
            "content_files",
            ["hello_world.txt", "BadName.TXT", "ok2.csv"],
        ));

        let err = VerifyFilenamesFlow
            .run(&ctx, &FlowParams::new())
            .await
            .unwrap_err();

        match err {
            AppError::Filenames(ValidationError::ValidationFailure { invalid }) => {
                assert_eq!(invalid, vec!["BadName.TXT"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            ctx.messages(),
            vec![
                r#"Valid filenames: ["hello_world.txt", "ok2.csv"]"#,
                r#"Invalid filenames: ["BadName.TXT"]"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_clean_folder_from_param() {
        let ctx = ctx(MockFileSystem::new().with_dir("docs", ["a.md", "b_1.md"]));
        let params = FlowParams::new().with("folder_path", "docs");

        VerifyFilenamesFlow.run(&ctx, &params).await.unwrap();

        assert_eq!(ctx.messages().last().unwrap(), "All filenames are valid.");
    }

    #[tokio::test]
    async fn test_missing_folder() {
        let ctx = ctx(MockFileSystem::new());

        let err = VerifyFilenamesFlow
            .run(&ctx, &FlowParams::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Filenames(ValidationError::DirectoryUnavailable { .. })
        ));
        assert!(ctx.messages().is_empty());
    }
}
