//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorStore;
pub use book_instances::BookInstanceStore;
pub use books::BookStore;
pub use genres::GenreStore;
pub use users::UserStore;

/// Record store: one handle per record kind, backed by PostgreSQL in production
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub instances: Arc<dyn BookInstanceStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }
}

#[cfg(test)]
pub mod mock {
    //! Repository assembled from mockall doubles

    use super::*;

    pub struct MockRepository {
        pub books: books::MockBookStore,
        pub authors: authors::MockAuthorStore,
        pub genres: genres::MockGenreStore,
        pub instances: book_instances::MockBookInstanceStore,
        pub users: users::MockUserStore,
    }

    impl MockRepository {
        pub fn new() -> Self {
            Self {
                books: books::MockBookStore::new(),
                authors: authors::MockAuthorStore::new(),
                genres: genres::MockGenreStore::new(),
                instances: book_instances::MockBookInstanceStore::new(),
                users: users::MockUserStore::new(),
            }
        }

        pub fn build(self) -> Repository {
            Repository {
                books: Arc::new(self.books),
                authors: Arc::new(self.authors),
                genres: Arc::new(self.genres),
                instances: Arc::new(self.instances),
                users: Arc::new(self.users),
            }
        }
    }
}
