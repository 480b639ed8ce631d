// Route handlers, split by security tier:
// - public:    no authentication (token acquisition)
// - protected: JWT + active-account validation required

pub mod protected;
pub mod public;
