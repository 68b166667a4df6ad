pub mod domain;
pub mod ports;
pub mod session;
pub mod view;

pub use domain::{
    select_default_video, CourseProgress, Mission, MissionDetail, MissionSummary, NewUser,
    ProfileUpdate, Topic, User, UserCredentials, Video,
};
pub use ports::{ContentStore, CredentialStore, PortError, PortResult, SessionStore, ViewRenderer};
pub use session::{Flash, FlashKind, Session, SessionUser};
pub use view::View;
