use beego::Controller;

/// Operations about Users
pub struct UserController {
    pub base: Controller,
}

impl UserController {
    /// @Title Login
    /// @Description Logs user into the system
    /// @Param username query string true "the username for login"
    /// @Param password query string true "the password for login"
    /// @Success 200 {string} login success
    /// @Failure 403 user not exist
    /// @router /login [post]
    pub fn login(&mut self) {}

    /// @Title Get
    /// @Description get user by uid
    /// @Param uid path string true "The key for staticblock"
    /// @Success 200 {object} models.User
    /// @Failure 403 :uid is empty
    /// @router /:uid [get]
    pub fn get(&mut self) {}

    /// @Title Logout
    /// @router /logout
    pub fn logout(&self) {}

    fn validate(&self) -> bool {
        true
    }
}
