/*!
 * End-to-end tests: PDF bytes in, exported summary out
 */

use std::sync::Arc;

use pdfsum::app_config::Config;
use pdfsum::app_controller::Controller;
use pdfsum::document::{Document, LengthTier};
use pdfsum::errors::PROTECTED_MESSAGE;
use pdfsum::pdf_extractor::{LopdfExtractor, TextExtractor};
use pdfsum::presenter::{ExportFormat, SummaryPresenter};
use pdfsum::providers::mock::MockProvider;

use crate::common::{self, RecordingClipboard};

#[tokio::test]
async fn test_helloWorld_shortTier_shouldSummarizeAndExportText() {
    common::init_logging();
    let provider = MockProvider::working().with_custom_response(|_| "Hello.".to_string());
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(LopdfExtractor::new()), provider.clone());

    let document = Document::new("hello.pdf", common::build_pdf(&["Hello world"]));
    let summary = controller.submit(vec![document], LengthTier::Short).await.unwrap();

    let request = provider.last_request().unwrap();
    assert_eq!(request.inputs.trim(), "Hello world");
    assert_eq!(request.parameters.max_length, 150);
    assert_eq!(request.parameters.min_length, 90);

    let mut presenter = SummaryPresenter::new();
    presenter.show(&summary);
    let artifact = presenter.download(ExportFormat::Txt);

    assert_eq!(artifact.file_name, "summary.txt");
    assert_eq!(artifact.text(), "Hello.");
}

#[tokio::test]
async fn test_whitespaceOnlyPdf_shouldNeverCallSummarizer() {
    let provider = MockProvider::working();
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(LopdfExtractor::new()), provider.clone());

    let document = Document::new("empty.pdf", common::build_pdf(&["", ""]));
    let summary = controller.submit(vec![document], LengthTier::Long).await;

    assert!(summary.is_none());
    assert!(controller.ui_error().is_some());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_protectedPdf_shouldShowProtectedMessage() {
    struct Encrypted;

    impl TextExtractor for Encrypted {
        fn extract(&self, _bytes: &[u8]) -> Result<pdfsum::document::PdfContent, pdfsum::errors::ExtractionError> {
            Err(pdfsum::errors::ExtractionError::Protected)
        }
    }

    let provider = MockProvider::working();
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(Encrypted), provider.clone());

    let document = Document::new("locked.pdf", b"%PDF-1.7\n".to_vec());
    let summary = controller.submit(vec![document], LengthTier::Medium).await;

    assert!(summary.is_none());
    assert_eq!(controller.ui_error(), Some(PROTECTED_MESSAGE));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_encryptedPdf_throughLopdf_shouldShowProtectedMessage() {
    let provider = MockProvider::working();
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(LopdfExtractor::new()), provider.clone());

    let document = Document::new("locked.pdf", common::build_encrypted_pdf(&["Secret"]));
    let summary = controller.submit(vec![document], LengthTier::Short).await;

    assert!(summary.is_none());
    assert_eq!(controller.ui_error(), Some(PROTECTED_MESSAGE));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_editedSummary_shouldFlowToEveryOutput() {
    let provider = MockProvider::working().with_custom_response(|_| "Draft summary".to_string());
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(LopdfExtractor::new()), provider);
    let summary = controller
        .submit(
            vec![Document::new("report.pdf", common::build_pdf(&["Revenue grew", "Costs fell"]))],
            LengthTier::Medium,
        )
        .await
        .unwrap();

    let clipboard = Arc::new(RecordingClipboard::default());
    let mut presenter = SummaryPresenter::new().with_clipboard(clipboard.clone());
    presenter.show(&summary);
    presenter.toggle_edit();
    presenter.set_text("Final <summary>").unwrap();
    presenter.save();

    presenter.copy().await.unwrap();
    assert_eq!(clipboard.writes(), vec!["Final <summary>".to_string()]);

    let dir = common::create_temp_dir().unwrap();
    let txt = presenter.download(ExportFormat::Txt).write_to(dir.path()).unwrap();
    let html = presenter.download(ExportFormat::Html).write_to(dir.path()).unwrap();

    assert_eq!(std::fs::read_to_string(txt).unwrap(), "Final <summary>");
    assert!(std::fs::read_to_string(html).unwrap().contains("Final &lt;summary&gt;"));
}

#[tokio::test]
async fn test_multiPagePdf_shouldSendAllPagesInOrder() {
    let provider = MockProvider::working();
    let mut controller = Controller::with_parts(&Config::default(), Arc::new(LopdfExtractor::new()), provider.clone());

    let document = Document::new("pages.pdf", common::build_pdf(&["Chapter one", "Chapter two"]));
    controller.submit(vec![document], LengthTier::Long).await.unwrap();

    let inputs = provider.last_request().unwrap().inputs;
    let one = inputs.find("Chapter one").unwrap();
    let two = inputs.find("Chapter two").unwrap();
    assert!(one < two);
}
