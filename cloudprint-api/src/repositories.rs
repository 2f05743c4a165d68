use crate::endpoints::{jobs::SubmitJob, printers::SearchPrinters};

pub struct PrinterRepository;

impl PrinterRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn search(&self) -> SearchPrinters {
        SearchPrinters::default()
    }
}

pub struct JobRepository;

impl JobRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn submit(
        &self,
        printer_id: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> SubmitJob {
        SubmitJob::new(printer_id, file_name, content)
    }
}
