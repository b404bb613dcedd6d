pub mod books;

use std::sync::Arc;

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

use books::repository::BookRepository;

/// Register every service module with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    repository: Arc<dyn BookRepository>,
    settings: &Settings,
) {
    registry.register(books::create_module(repository, settings.books.clone()));
}
