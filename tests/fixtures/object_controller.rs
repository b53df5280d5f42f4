use beego::Controller;

/// Operations about object
pub struct ObjectController {
    pub base: Controller,
}

impl ObjectController {
    /// @Title Create
    /// @Description create object
    /// @Param body body models.Object true "The object content"
    /// @Success 200 {string} models.Object.Id
    /// @Failure 403 body is empty
    /// @router / [post]
    pub fn post(&mut self) {}

    /// @Title Update
    /// @Param objectId path string true "The objectid you want to update"
    /// @router /:objectId [put]
    pub fn put(&mut self) {}

    /// @Title Delete
    /// @router /:objectId [delete]
    pub fn delete(&mut self) {}
}
