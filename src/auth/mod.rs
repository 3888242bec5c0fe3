pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, JwtServiceImpl, parse_algorithm};
pub use middleware::{UserExtractor, jwt_auth_middleware};
pub use password::{hash_password, verify_password};
