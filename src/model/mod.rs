pub mod attendance;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod overtime;
pub mod position;
pub mod salary;
pub mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use department::Department;
pub use employee::{Employee, EmployeeStatus};
pub use holiday::{Holiday, HolidayType};
pub use leave_request::{LeaveRequest, LeaveStatus, LeaveType};
pub use overtime::Overtime;
pub use position::Position;
pub use salary::{Salary, SalaryStatus};
pub use user::{User, UserRole};
