// Bookmarks services.
// Stateless helpers shared by the request handlers: input validation and output sanitization.

pub mod serializer;
pub mod validator;
pub mod xss_filter;
