//! Catalog browsing service

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::AuthorDetails,
        book::{BookDetails, BookShort},
        book_instance::{BookInstanceDetails, LoanStatus},
        Author, Genre, PageQuery,
    },
    repository::Repository,
};

/// Record counts shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.instances.count(None).await?,
            num_instances_available: self.repository.instances.count(Some(LoanStatus::Available)).await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
        })
    }

    /// Search books by title fragment
    pub async fn list_books(&self, title: Option<String>, page: &PageQuery) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(title, page.offset(), page.limit()).await
    }

    /// Book with author, genres and copies
    pub async fn get_book(&self, id: i32, today: NaiveDate) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.genres.list_for_book(id).await?;
        let instances = self
            .repository
            .instances
            .list_for_book(id)
            .await?
            .into_iter()
            .map(|instance| BookInstanceDetails::new(instance, today))
            .collect();

        Ok(BookDetails {
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn list_authors(&self, page: &PageQuery) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page.offset(), page.limit()).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Cheap round-trip to the record store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.genres.count().await.map(|_| ())
    }
}
